use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Timestamps must be strictly increasing: {current} does not follow {previous}")]
    UnorderedTimestamps {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("Matrix shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unknown variant '{value}' for {kind}")]
    UnknownVariant { kind: &'static str, value: String },
}
