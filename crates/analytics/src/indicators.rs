use crate::error::AnalyticsError;
use crate::returns::validate_prices;
use chrono::{DateTime, Utc};
use core_types::PriceSeries;
use serde::{Deserialize, Serialize};
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

/// One point of a moving-average overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAveragePoint {
    pub timestamp: DateTime<Utc>,
    /// `None` until `window` prices have been seen.
    pub value: Option<f64>,
}

/// Simple moving average of a price series, one output per input point.
pub fn moving_average(
    series: &PriceSeries,
    window: usize,
) -> Result<Vec<MovingAveragePoint>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameters(
            "moving-average window must be at least 1".to_string(),
        ));
    }
    if series.is_empty() {
        return Err(AnalyticsError::EmptySeries { required: 1, actual: 0 });
    }
    validate_prices(series)?;

    let mut sma = Sma::new(window).map_err(|_| {
        AnalyticsError::InvalidParameters(format!("unsupported moving-average window {window}"))
    })?;

    Ok(series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            // The indicator averages whatever it has seen so far; only report
            // it once the window is full.
            let avg = sma.next(p.price);
            MovingAveragePoint {
                timestamp: p.timestamp,
                value: (i + 1 >= window).then_some(avg),
            }
        })
        .collect())
}
