use crate::error::AnalyticsError;
use core_types::{PriceSeries, ReturnPoint, ReturnSeries};

/// Checks that every price is finite and strictly positive.
///
/// The first offending point is reported by timestamp.
pub fn validate_prices(series: &PriceSeries) -> Result<(), AnalyticsError> {
    match series
        .points()
        .iter()
        .find(|p| !p.price.is_finite() || p.price <= 0.0)
    {
        Some(bad) => Err(AnalyticsError::InvalidPrice {
            timestamp: bad.timestamp,
            price: bad.price,
        }),
        None => Ok(()),
    }
}

/// Simple period-over-period return `current / previous - 1`.
pub fn simple_return(previous: f64, current: f64) -> f64 {
    current / previous - 1.0
}

/// Derives simple returns from a price series.
///
/// The first timestamp is dropped since it has no prior price; each return is
/// stamped with the later of its two prices.
pub fn compute_returns(series: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    if series.len() < 2 {
        return Err(AnalyticsError::EmptySeries {
            required: 2,
            actual: series.len(),
        });
    }
    validate_prices(series)?;

    let mut points = Vec::with_capacity(series.len() - 1);
    for w in series.points().windows(2) {
        let value = simple_return(w[0].price, w[1].price);
        if !value.is_finite() {
            return Err(AnalyticsError::DegenerateSeries { metric: "return" });
        }
        points.push(ReturnPoint {
            timestamp: w[1].timestamp,
            value,
        });
    }

    Ok(ReturnSeries::new(points)?)
}
