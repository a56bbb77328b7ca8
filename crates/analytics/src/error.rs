use chrono::{DateTime, Utc};
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: need at least {required} points, got {actual}")]
    EmptySeries { required: usize, actual: usize },

    #[error("Invalid price {price} at {timestamp}: prices must be finite and positive")]
    InvalidPrice { timestamp: DateTime<Utc>, price: f64 },

    #[error("Degenerate series: metric '{metric}' evaluated to a non-finite value")]
    DegenerateSeries { metric: &'static str },

    #[error("Analytics parameters are invalid: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
