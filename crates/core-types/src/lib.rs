//! # Market Lens Core Types
//!
//! The shared data model of the workspace. Every other crate speaks in these
//! types: price and return series keyed by timestamp, the aligned multi-asset
//! matrix, and the correlation matrix.
//!
//! Series are immutable once built. Operations elsewhere in the workspace
//! derive new series from them and never mutate their input.

pub mod enums;
pub mod error;
pub mod matrix;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::{AlignmentPolicy, CorrelationMethod, PriceField, RankKey};
pub use error::CoreError;
pub use matrix::{AlignedMatrix, CorrelationMatrix};
pub use series::{DrawdownPoint, DrawdownSeries, PricePoint, PriceSeries, ReturnPoint, ReturnSeries};
