//! Property-based tests for alignment and correlation invariants.

use chrono::{Duration, TimeZone, Utc};
use core_types::{AlignedMatrix, AlignmentPolicy, CorrelationMethod, PriceField, PriceSeries};
use cross_asset::{CorrelationEngine, SeriesAligner, correlate_prices};
use proptest::prelude::*;

// ==================== Test Data Generators ====================

/// Generate `assets` columns of `rows` returns, some of them missing.
fn arb_columns(assets: usize, rows: usize) -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::weighted(0.9, -0.2..0.2_f64), rows),
        assets,
    )
}

fn matrix(columns: Vec<Vec<Option<f64>>>) -> AlignedMatrix {
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
    let rows = columns[0].len();
    AlignedMatrix::new(
        (0..rows).map(|i| start + Duration::days(i as i64)).collect(),
        (0..columns.len()).map(|i| format!("asset{i}")).collect(),
        columns,
    )
    .unwrap()
}

fn daily(offset: i64, prices: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
    PriceSeries::from_pairs(
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| (start + Duration::days(offset + i as i64), *p)),
        PriceField::Close,
    )
    .unwrap()
}

// ==================== Correlation Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Unit diagonal, exact symmetry and bounded entries for both estimators
    #[test]
    fn prop_correlation_matrix_shape(columns in arb_columns(4, 30)) {
        let m = matrix(columns);
        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            let corr = CorrelationEngine::new().compute(&m, method);
            prop_assert_eq!(corr.len(), 4);
            for i in 0..4 {
                prop_assert_eq!(corr.get(i, i), Some(1.0));
                for j in 0..4 {
                    prop_assert_eq!(corr.get(i, j), corr.get(j, i));
                    if let Some(v) = corr.get(i, j) {
                        prop_assert!((-1.0..=1.0).contains(&v));
                    }
                }
            }
        }
    }

    /// A column correlates perfectly with its own copy
    #[test]
    fn prop_self_correlation_is_one(column in prop::collection::vec(-0.2..0.2_f64, 3..40)) {
        prop_assume!(column.iter().any(|v| *v != column[0]));
        let values: Vec<Option<f64>> = column.into_iter().map(Some).collect();
        let m = matrix(vec![values.clone(), values]);
        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            let r = CorrelationEngine::new().compute(&m, method).get(0, 1).unwrap();
            prop_assert!((r - 1.0).abs() < 1e-9);
        }
    }

    /// Strictly increasing against strictly decreasing is Spearman -1
    #[test]
    fn prop_opposite_monotone_spearman(steps in prop::collection::vec(0.01..5.0_f64, 2..40)) {
        let mut up = Vec::with_capacity(steps.len());
        let mut level = 0.0;
        for s in &steps {
            level += s;
            up.push(Some(level));
        }
        let down: Vec<Option<f64>> = up.iter().map(|v| v.map(|x| -x)).collect();
        let m = matrix(vec![up, down]);
        let r = CorrelationEngine::new().compute(&m, CorrelationMethod::Spearman).get(0, 1);
        prop_assert_eq!(r, Some(-1.0));
    }
}

// ==================== Alignment Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Inner join keeps exactly the overlapping days, and every cell is filled
    #[test]
    fn prop_inner_join_overlap(len_a in 2usize..30, len_b in 2usize..30, offset in 0i64..30) {
        let a = daily(0, &vec![100.0; len_a]);
        let b = daily(offset, &vec![50.0; len_b]);
        let overlap = (len_a as i64).min(offset + len_b as i64) - offset;
        let result = SeriesAligner::new(AlignmentPolicy::Inner)
            .align(&[("A".to_string(), a), ("B".to_string(), b)]);
        if overlap >= 2 {
            let m = result.unwrap();
            prop_assert_eq!(m.n_rows() as i64, overlap);
            prop_assert_eq!(m.missing_count(), 0);
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Correlating a price path with a scaled copy of itself gives 1
    #[test]
    fn prop_scaled_prices_share_returns(
        prices in prop::collection::vec(1.0..500.0_f64, 4..40),
        scale in 0.5..4.0_f64,
    ) {
        prop_assume!(prices.windows(3).any(|w| (w[1] / w[0]) != (w[2] / w[1])));
        let scaled: Vec<f64> = prices.iter().map(|p| p * scale).collect();
        let corr = correlate_prices(
            &[("A".to_string(), daily(0, &prices)), ("B".to_string(), daily(0, &scaled))],
            AlignmentPolicy::Inner,
            CorrelationMethod::Pearson,
        )
        .unwrap();
        prop_assert!((corr.get(0, 1).unwrap() - 1.0).abs() < 1e-6);
    }
}
