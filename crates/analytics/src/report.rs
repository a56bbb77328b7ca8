use serde::{Deserialize, Serialize};

/// Risk and performance figures for one price series.
///
/// This struct is the output of the `AnalyticsEngine` and the row payload of
/// ranking reports. Percentages are expressed in percent (21.0 means 21%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetricSet {
    pub total_return_pct: f64,
    /// Sample standard deviation of returns, annualized.
    pub annualized_volatility_pct: f64,
    /// Deepest decline from a running peak; zero or negative.
    pub max_drawdown_pct: f64,
    /// Defined as exactly `0.0` when annualized volatility is zero.
    pub sharpe_ratio: f64,

    /// Total return compounded to a 365-day year over the series' calendar
    /// span. `None` when the compounding overflows.
    pub annualized_return_pct: Option<f64>,
    pub last_price: f64,
    /// Number of returns the statistics were computed from.
    pub observations: usize,
}
