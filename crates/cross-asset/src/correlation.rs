use crate::aligner::SeriesAligner;
use crate::error::CrossAssetError;
use crate::transform::aligned_returns;
use core_types::{AlignedMatrix, AlignmentPolicy, CorrelationMatrix, CorrelationMethod, PriceSeries};
use std::cmp::Ordering;

/// A stateless calculator for cross-asset correlation matrices.
///
/// The engine correlates whatever columns it is given. Callers that want the
/// conventional return-based view should go through `correlate_prices`.
#[derive(Debug, Default)]
pub struct CorrelationEngine {}

impl CorrelationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the correlation matrix of every column pair.
    ///
    /// * Pearson uses, for each pair, the rows where both assets have a value.
    /// * Spearman first drops every row with a missing value in any asset,
    ///   then ranks each column (ties share their average rank) and takes the
    ///   Pearson correlation of the ranks.
    ///
    /// Pairs with fewer than two usable rows, or where either side is
    /// constant, are undefined. When Spearman finds no complete row at all,
    /// every off-diagonal entry is undefined.
    pub fn compute(&self, matrix: &AlignedMatrix, method: CorrelationMethod) -> CorrelationMatrix {
        match method {
            CorrelationMethod::Pearson => self.pearson_matrix(matrix),
            CorrelationMethod::Spearman => self.spearman_matrix(matrix),
        }
    }

    fn pearson_matrix(&self, matrix: &AlignedMatrix) -> CorrelationMatrix {
        CorrelationMatrix::from_upper_triangle(matrix.assets().to_vec(), |i, j| {
            let (xs, ys): (Vec<f64>, Vec<f64>) = matrix
                .column(i)
                .iter()
                .zip(matrix.column(j))
                .filter_map(|pair| match pair {
                    (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
                    _ => None,
                })
                .unzip();
            pearson(&xs, &ys)
        })
    }

    fn spearman_matrix(&self, matrix: &AlignedMatrix) -> CorrelationMatrix {
        let rows: Vec<usize> = matrix
            .complete_rows()
            .into_iter()
            .filter(|&row| {
                matrix
                    .columns()
                    .iter()
                    .all(|c| c[row].is_some_and(f64::is_finite))
            })
            .collect();

        if rows.is_empty() {
            return CorrelationMatrix::undefined(matrix.assets().to_vec());
        }

        let ranked: Vec<Vec<f64>> = matrix
            .columns()
            .iter()
            .map(|column| {
                let values: Vec<f64> = rows.iter().filter_map(|&row| column[row]).collect();
                average_ranks(&values)
            })
            .collect();

        CorrelationMatrix::from_upper_triangle(matrix.assets().to_vec(), |i, j| {
            pearson(&ranked[i], &ranked[j])
        })
    }
}

/// Aligns price series, converts them to returns and correlates the returns.
pub fn correlate_prices(
    inputs: &[(String, PriceSeries)],
    policy: AlignmentPolicy,
    method: CorrelationMethod,
) -> Result<CorrelationMatrix, CrossAssetError> {
    let prices = SeriesAligner::new(policy).align(inputs)?;
    let returns = aligned_returns(&prices)?;
    Ok(CorrelationEngine::new().compute(&returns, method))
}

/// Pearson correlation coefficient of two equally long samples.
///
/// `None` for fewer than two observations or when either sample is constant.
/// The result is clamped to `[-1, 1]` to absorb rounding.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }
    if is_constant(xs) || is_constant(ys) {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // sqrt of the product keeps perfectly (anti-)correlated inputs at exactly +-1.
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    let r = sxy / denom;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// 1-based ranks; tied values share the mean of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1 ..= end.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeZone, Utc};
    use core_types::PriceField;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, d, 0, 0, 0).unwrap()
    }

    fn matrix(columns: &[(&str, Vec<Option<f64>>)]) -> AlignedMatrix {
        let rows = columns[0].1.len() as u32;
        AlignedMatrix::new(
            (1..=rows).map(day).collect(),
            columns.iter().map(|(n, _)| n.to_string()).collect(),
            columns.iter().map(|(_, c)| c.clone()).collect(),
        )
        .unwrap()
    }

    fn full(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn exact_scaling_is_perfect_pearson() {
        let m = matrix(&[
            ("A", full(&[0.01, -0.02, 0.03])),
            ("B", full(&[0.02, -0.04, 0.06])),
        ]);
        let corr = CorrelationEngine::new().compute(&m, CorrelationMethod::Pearson);
        assert_relative_eq!(corr.get(0, 1).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn duplicate_asset_correlates_perfectly_under_both_methods() {
        let values = full(&[0.5, -1.2, 0.3, 2.2, -0.7]);
        let m = matrix(&[("A", values.clone()), ("A copy", values)]);
        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            let corr = CorrelationEngine::new().compute(&m, method);
            assert_relative_eq!(corr.get(0, 1).unwrap(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn opposite_monotone_series_are_exactly_minus_one_under_spearman() {
        let m = matrix(&[
            ("Up", full(&[1.0, 2.0, 4.0, 8.0, 16.0, 32.0])),
            ("Down", full(&[9.0, 7.5, 7.0, 3.0, 0.5, 0.1])),
        ]);
        let corr = CorrelationEngine::new().compute(&m, CorrelationMethod::Spearman);
        assert_eq!(corr.get(0, 1), Some(-1.0));
    }

    #[test]
    fn spearman_captures_monotone_nonlinear_relations() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = matrix(&[
            ("X", full(&xs)),
            ("Cube", full(&xs.map(|x: f64| x.powi(3)))),
        ]);
        let engine = CorrelationEngine::new();
        let spearman = engine.compute(&m, CorrelationMethod::Spearman).get(0, 1).unwrap();
        let pearson = engine.compute(&m, CorrelationMethod::Pearson).get(0, 1).unwrap();
        assert_relative_eq!(spearman, 1.0, epsilon = 1e-12);
        assert!(pearson < 1.0);
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let m = matrix(&[
            ("A", vec![Some(1.0), Some(2.0), None, Some(4.0)]),
            ("B", vec![Some(2.0), Some(4.0), Some(100.0), Some(8.0)]),
            ("C", vec![None, Some(1.0), Some(5.0), Some(3.0)]),
        ]);
        let corr = CorrelationEngine::new().compute(&m, CorrelationMethod::Pearson);
        // A/B share rows 0, 1 and 3 where B == 2A.
        assert_relative_eq!(corr.get_by_name("A", "B").unwrap(), 1.0, epsilon = 1e-12);
        // B/C share rows 1..=3.
        let expected = pearson(&[4.0, 100.0, 8.0], &[1.0, 5.0, 3.0]).unwrap();
        assert_relative_eq!(corr.get_by_name("B", "C").unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn spearman_drops_incomplete_rows_before_ranking() {
        let m = matrix(&[
            ("A", vec![Some(1.0), Some(2.0), None, Some(3.0)]),
            ("B", vec![Some(3.0), Some(2.0), Some(-50.0), Some(1.0)]),
        ]);
        let corr = CorrelationEngine::new().compute(&m, CorrelationMethod::Spearman);
        assert_eq!(corr.get(0, 1), Some(-1.0));
    }

    #[test]
    fn spearman_without_complete_rows_is_all_undefined() {
        let m = matrix(&[
            ("A", vec![Some(1.0), None, Some(3.0)]),
            ("B", vec![None, Some(2.0), None]),
        ]);
        let corr = CorrelationEngine::new().compute(&m, CorrelationMethod::Spearman);
        assert_eq!(corr.len(), 2);
        assert!(!corr.has_defined_pairs());
        assert_eq!(corr.get(0, 0), Some(1.0));
    }

    #[test]
    fn constant_column_is_undefined_not_nan() {
        let m = matrix(&[
            ("Flat", full(&[0.1, 0.1, 0.1, 0.1])),
            ("Moving", full(&[0.3, -0.1, 0.2, 0.0])),
        ]);
        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            let corr = CorrelationEngine::new().compute(&m, method);
            assert_eq!(corr.get(0, 1), None);
            assert_eq!(corr.get(0, 0), Some(1.0));
        }
    }

    #[test]
    fn matrix_is_symmetric_with_bounded_entries() {
        let m = matrix(&[
            ("A", full(&[0.3, -0.2, 0.15, 0.07, -0.01])),
            ("B", full(&[0.1, 0.0, -0.3, 0.2, 0.05])),
            ("C", full(&[-0.2, 0.4, 0.1, -0.1, 0.3])),
        ]);
        let corr = CorrelationEngine::new().compute(&m, CorrelationMethod::Pearson);
        for i in 0..3 {
            assert_eq!(corr.get(i, i), Some(1.0));
            for j in 0..3 {
                assert_eq!(corr.get(i, j), corr.get(j, i));
                let v = corr.get(i, j).unwrap();
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn average_ranks_share_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
        assert_eq!(average_ranks(&[7.0, 7.0, 7.0]), vec![2.0, 2.0, 2.0]);
        assert!(average_ranks(&[]).is_empty());
    }

    #[test]
    fn correlate_prices_works_on_returns() {
        let a = PriceSeries::from_pairs(
            [(day(1), 100.0), (day(2), 101.0), (day(3), 99.0), (day(4), 103.0), (day(5), 104.0)],
            PriceField::Close,
        )
        .unwrap();
        // On the common days B trades at exactly twice A's price, so the returns match.
        let b = PriceSeries::from_pairs(
            [(day(2), 202.0), (day(3), 198.0), (day(4), 206.0), (day(5), 208.0), (day(6), 1.0)],
            PriceField::Close,
        )
        .unwrap();
        let corr = correlate_prices(
            &[("A".to_string(), a), ("B".to_string(), b)],
            AlignmentPolicy::Inner,
            CorrelationMethod::Pearson,
        )
        .unwrap();
        assert_relative_eq!(corr.get(0, 1).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn correlate_prices_propagates_alignment_errors() {
        let a = PriceSeries::from_pairs([(day(1), 1.0), (day(2), 2.0)], PriceField::Close).unwrap();
        let err = correlate_prices(
            &[("A".to_string(), a)],
            AlignmentPolicy::Inner,
            CorrelationMethod::Spearman,
        )
        .unwrap_err();
        assert!(matches!(err, CrossAssetError::InsufficientData { .. }));
    }

    #[test]
    fn correlate_prices_under_outer_join_rejects_missing_asset() {
        let a = PriceSeries::from_pairs(
            [(day(1), 100.0), (day(2), 101.0), (day(3), 99.0), (day(4), 103.0)],
            PriceField::Close,
        )
        .unwrap();
        let empty = PriceSeries::new(vec![], PriceField::Close).unwrap();
        let err = correlate_prices(
            &[("A".to_string(), a), ("Empty".to_string(), empty)],
            AlignmentPolicy::Outer,
            CorrelationMethod::Pearson,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CrossAssetError::InsufficientData { exclusive_assets, .. } if exclusive_assets == vec!["Empty".to_string()]
        ));
    }
}
