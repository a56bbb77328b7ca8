use crate::enums::PriceField;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// An ordered price history for one asset.
///
/// Construction only checks ordering. Price validity (finite and positive) is
/// checked by the operations that consume the series, so that they can name
/// the offending timestamp in their own error type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceSeriesParts")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    field: PriceField,
}

#[derive(Deserialize)]
struct PriceSeriesParts {
    points: Vec<PricePoint>,
    field: PriceField,
}

impl TryFrom<PriceSeriesParts> for PriceSeries {
    type Error = CoreError;

    fn try_from(parts: PriceSeriesParts) -> Result<Self, Self::Error> {
        Self::new(parts.points, parts.field)
    }
}

impl PriceSeries {
    /// Builds a series, rejecting timestamps that are not strictly increasing.
    pub fn new(points: Vec<PricePoint>, field: PriceField) -> Result<Self, CoreError> {
        check_ordering(points.iter().map(|p| p.timestamp))?;
        Ok(Self { points, field })
    }

    /// Convenience constructor from `(timestamp, price)` pairs.
    pub fn from_pairs<I>(pairs: I, field: PriceField) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let points = pairs
            .into_iter()
            .map(|(timestamp, price)| PricePoint { timestamp, price })
            .collect();
        Self::new(points, field)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn field(&self) -> PriceField {
        self.field
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }
}

/// A simple period-over-period return, stamped with the later timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Returns derived from a `PriceSeries`; one entry shorter than its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReturnSeriesParts")]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

#[derive(Deserialize)]
struct ReturnSeriesParts {
    points: Vec<ReturnPoint>,
}

impl TryFrom<ReturnSeriesParts> for ReturnSeries {
    type Error = CoreError;

    fn try_from(parts: ReturnSeriesParts) -> Result<Self, Self::Error> {
        Self::new(parts.points)
    }
}

impl ReturnSeries {
    pub fn new(points: Vec<ReturnPoint>) -> Result<Self, CoreError> {
        check_ordering(points.iter().map(|p| p.timestamp))?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

/// One step of the running-peak drawdown computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub timestamp: DateTime<Utc>,
    /// Growth of one unit of wealth up to and including this period.
    pub cumulative: f64,
    /// Highest wealth seen so far, starting from the initial unit.
    pub peak: f64,
    /// Wealth relative to the running peak, minus one. Never positive, and
    /// finite even when `cumulative` and `peak` overflow.
    pub drawdown: f64,
}

/// Drawdown path aligned with a `ReturnSeries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownSeries {
    points: Vec<DrawdownPoint>,
}

impl DrawdownSeries {
    pub fn new(points: Vec<DrawdownPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DrawdownPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The deepest drawdown as a fraction (e.g. `-0.5`), or `0.0` for an empty path.
    ///
    /// A NaN anywhere in the path is returned as NaN so callers can reject it.
    pub fn max_drawdown(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.drawdown)
            .fold(0.0, |deepest, d| if d.is_nan() || d < deepest { d } else { deepest })
    }
}

fn check_ordering<I>(timestamps: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut previous: Option<DateTime<Utc>> = None;
    for current in timestamps {
        if let Some(previous) = previous {
            if current <= previous {
                return Err(CoreError::UnorderedTimestamps { previous, current });
            }
        }
        previous = Some(current);
    }
    Ok(())
}
