use crate::drawdown::drawdown_series;
use crate::error::AnalyticsError;
use crate::report::RiskMetricSet;
use crate::returns::compute_returns;
use crate::stats;
use configuration::MetricsParams;
use core_types::PriceSeries;

/// A stateless calculator for deriving risk metrics from a price series.
///
/// The engine holds only its validated parameters, so one instance can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine {
    params: MetricsParams,
}

impl AnalyticsEngine {
    /// Creates an engine, rejecting a negative or non-finite risk-free rate and
    /// a zero period count.
    pub fn new(params: MetricsParams) -> Result<Self, AnalyticsError> {
        if !params.risk_free_rate_annual.is_finite() || params.risk_free_rate_annual < 0.0 {
            return Err(AnalyticsError::InvalidParameters(format!(
                "risk_free_rate_annual must be a finite value >= 0, got {}",
                params.risk_free_rate_annual
            )));
        }
        if params.periods_per_year == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "periods_per_year must be greater than 0".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// The main entry point for calculating risk metrics.
    ///
    /// # Errors
    ///
    /// * `EmptySeries` when the series has fewer than two prices.
    /// * `InvalidPrice` when a price is non-positive or non-finite.
    /// * `DegenerateSeries` when one of the four core metrics is not finite.
    ///
    /// A zero-volatility series is not an error: its Sharpe ratio is `0.0`.
    pub fn compute(&self, series: &PriceSeries) -> Result<RiskMetricSet, AnalyticsError> {
        let returns = compute_returns(series)?;
        let values: Vec<f64> = returns.values().collect();

        // compute_returns guarantees at least two prices.
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(AnalyticsError::EmptySeries {
                    required: 2,
                    actual: series.len(),
                });
            }
        };

        let total_return_pct = (last.price / first.price - 1.0) * 100.0;

        let periods = f64::from(self.params.periods_per_year);
        let std_dev = stats::sample_std_dev(&values);
        let annualized_volatility_pct = std_dev * periods.sqrt() * 100.0;

        let max_drawdown_pct = drawdown_series(&returns).max_drawdown() * 100.0;

        let mean = stats::mean(&values).unwrap_or(0.0);
        let sharpe_ratio = sharpe_ratio(mean, std_dev, periods, self.params.risk_free_rate_annual);

        let days_elapsed = (last.timestamp - first.timestamp).num_days();
        let annualized_return_pct =
            Some(annualize_return(total_return_pct, days_elapsed)).filter(|v| v.is_finite());

        Ok(RiskMetricSet {
            total_return_pct: ensure_finite("total_return_pct", total_return_pct)?,
            annualized_volatility_pct: ensure_finite(
                "annualized_volatility_pct",
                annualized_volatility_pct,
            )?,
            max_drawdown_pct: ensure_finite("max_drawdown_pct", max_drawdown_pct)?,
            sharpe_ratio: ensure_finite("sharpe_ratio", sharpe_ratio)?,
            annualized_return_pct,
            last_price: last.price,
            observations: values.len(),
        })
    }
}

/// Annualized Sharpe ratio from per-period mean and standard deviation.
///
/// `(mean * periods - risk_free) / (std_dev * sqrt(periods))`. A riskless
/// series (annualized volatility exactly zero) reports `0.0`, not an error.
pub fn sharpe_ratio(mean: f64, std_dev: f64, periods_per_year: f64, risk_free_rate_annual: f64) -> f64 {
    let annualized_volatility = std_dev * periods_per_year.sqrt();
    if annualized_volatility == 0.0 {
        return 0.0;
    }
    (mean * periods_per_year - risk_free_rate_annual) / annualized_volatility
}

/// Compounds a total return (in percent) to a 365-day year.
///
/// A zero-day window is treated as one day so that same-day queries still
/// produce a number.
pub fn annualize_return(total_return_pct: f64, days_elapsed: i64) -> f64 {
    let days = if days_elapsed == 0 { 1 } else { days_elapsed };
    ((1.0 + total_return_pct / 100.0).powf(365.0 / days as f64) - 1.0) * 100.0
}

fn ensure_finite(metric: &'static str, value: f64) -> Result<f64, AnalyticsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalyticsError::DegenerateSeries { metric })
    }
}
