use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rectangular table of values sharing one timestamp index.
///
/// Columns are assets, rows are timestamps. Every column has exactly one
/// entry per row; `None` is the explicit missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AlignedMatrixParts")]
pub struct AlignedMatrix {
    index: Vec<DateTime<Utc>>,
    assets: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

/// Unchecked wire form; deserialization goes through `AlignedMatrix::new`.
#[derive(Deserialize)]
struct AlignedMatrixParts {
    index: Vec<DateTime<Utc>>,
    assets: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl TryFrom<AlignedMatrixParts> for AlignedMatrix {
    type Error = CoreError;

    fn try_from(parts: AlignedMatrixParts) -> Result<Self, Self::Error> {
        Self::new(parts.index, parts.assets, parts.columns)
    }
}

impl AlignedMatrix {
    /// Builds a matrix from column vectors, one per asset, in asset order.
    pub fn new(
        index: Vec<DateTime<Utc>>,
        assets: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        if assets.len() != columns.len() {
            return Err(CoreError::ShapeMismatch(format!(
                "{} asset names for {} columns",
                assets.len(),
                columns.len()
            )));
        }
        if let Some((name, column)) = assets
            .iter()
            .zip(&columns)
            .find(|(_, column)| column.len() != index.len())
        {
            return Err(CoreError::ShapeMismatch(format!(
                "column '{}' has {} rows, index has {}",
                name,
                column.len(),
                index.len()
            )));
        }
        if index.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CoreError::ShapeMismatch(
                "index timestamps must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { index, assets, columns })
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn columns(&self) -> &[Vec<Option<f64>>] {
        &self.columns
    }

    pub fn column(&self, asset: usize) -> &[Option<f64>] {
        &self.columns[asset]
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Row positions where every asset has a value.
    pub fn complete_rows(&self) -> Vec<usize> {
        (0..self.n_rows())
            .filter(|&row| self.columns.iter().all(|c| c[row].is_some()))
            .collect()
    }

    pub fn missing_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.iter().filter(|v| v.is_none()).count())
            .sum()
    }
}

/// A square, symmetric correlation table indexed by asset name on both axes.
///
/// The diagonal is always `Some(1.0)`. An off-diagonal `None` means the
/// coefficient is undefined for that pair (too few observations or a
/// zero-variance series).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    assets: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Builds the matrix from its strict upper triangle.
    ///
    /// `pair(i, j)` is called once for every `i < j`; the result is mirrored to
    /// `(j, i)` so the matrix is symmetric bit for bit.
    pub fn from_upper_triangle<F>(assets: Vec<String>, mut pair: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<f64>,
    {
        let n = assets.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let v = pair(i, j);
                values[i][j] = v;
                values[j][i] = v;
            }
        }
        Self { assets, values }
    }

    /// A matrix where every pair is undefined.
    pub fn undefined(assets: Vec<String>) -> Self {
        Self::from_upper_triangle(assets, |_, _| None)
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.assets.iter().position(|x| x == a)?;
        let j = self.assets.iter().position(|x| x == b)?;
        self.get(i, j)
    }

    /// True when at least one off-diagonal coefficient is defined.
    pub fn has_defined_pairs(&self) -> bool {
        self.values
            .iter()
            .enumerate()
            .any(|(i, row)| row.iter().enumerate().any(|(j, v)| i != j && v.is_some()))
    }
}
