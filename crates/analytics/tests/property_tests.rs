//! Property-based tests for the single-asset risk metrics.

use analytics::{AnalyticsEngine, compute_returns, drawdown_series};
use chrono::{Duration, TimeZone, Utc};
use configuration::MetricsParams;
use core_types::{PriceField, PriceSeries};
use proptest::prelude::*;

// ==================== Test Data Generators ====================

/// Generate a random price series (all positive values)
fn arb_prices(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..=max_len)
}

fn daily(prices: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    PriceSeries::from_pairs(
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| (start + Duration::days(i as i64), *p)),
        PriceField::AdjustedClose,
    )
    .unwrap()
}

fn engine() -> AnalyticsEngine {
    AnalyticsEngine::new(MetricsParams::default()).unwrap()
}

// ==================== Return Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Returns are one shorter than prices
    #[test]
    fn prop_returns_length(prices in arb_prices(2, 100)) {
        let returns = compute_returns(&daily(&prices)).unwrap();
        prop_assert_eq!(returns.len(), prices.len() - 1);
    }

    /// Drawdown path is aligned with returns and never positive
    #[test]
    fn prop_drawdown_never_positive(prices in arb_prices(2, 100)) {
        let returns = compute_returns(&daily(&prices)).unwrap();
        let path = drawdown_series(&returns);
        prop_assert_eq!(path.len(), returns.len());
        for p in path.points() {
            prop_assert!(p.drawdown <= 0.0);
            prop_assert!(p.peak >= 1.0);
        }
    }
}

// ==================== Metric Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every metric of a valid series is finite and max drawdown is non-positive
    #[test]
    fn prop_metrics_are_finite(prices in arb_prices(2, 100)) {
        let m = engine().compute(&daily(&prices)).unwrap();
        prop_assert!(m.total_return_pct.is_finite());
        prop_assert!(m.annualized_volatility_pct.is_finite());
        prop_assert!(m.annualized_volatility_pct >= 0.0);
        prop_assert!(m.sharpe_ratio.is_finite());
        prop_assert!(m.max_drawdown_pct <= 0.0);
    }

    /// Constant prices give the neutral metric set
    #[test]
    fn prop_constant_series_is_neutral(price in 1.0..1000.0_f64, len in 2usize..60) {
        let m = engine().compute(&daily(&vec![price; len])).unwrap();
        prop_assert_eq!(m.total_return_pct, 0.0);
        prop_assert_eq!(m.annualized_volatility_pct, 0.0);
        prop_assert_eq!(m.max_drawdown_pct, 0.0);
        prop_assert_eq!(m.sharpe_ratio, 0.0);
    }

    /// A non-decreasing series never draws down
    #[test]
    fn prop_non_decreasing_has_zero_drawdown(mut prices in arb_prices(2, 100)) {
        prices.sort_by(|a, b| a.total_cmp(b));
        let m = engine().compute(&daily(&prices)).unwrap();
        prop_assert_eq!(m.max_drawdown_pct, 0.0);
    }

    /// Any strict decline somewhere produces a strictly negative drawdown
    #[test]
    fn prop_decline_has_negative_drawdown(
        mut prices in arb_prices(2, 100),
        drop in 0.5..0.99_f64,
        at in any::<prop::sample::Index>(),
    ) {
        let i = at.index(prices.len() - 1) + 1;
        prices[i] = prices[i - 1] * drop;
        let m = engine().compute(&daily(&prices)).unwrap();
        prop_assert!(m.max_drawdown_pct < 0.0);
    }
}
