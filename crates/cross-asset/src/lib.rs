//! # Market Lens Cross-Asset Analytics
//!
//! Multi-asset operations: putting several price series on one calendar and
//! measuring how their returns move together.
//!
//! - `SeriesAligner`: inner-join (default), outer or forward-filled alignment
//!   of labelled price series into an `AlignedMatrix`.
//! - `aligned_returns`: aligned prices to aligned simple returns.
//! - `CorrelationEngine`: Pearson or Spearman correlation matrices.
//! - `correlate_prices`: align, convert to returns, correlate. Correlation is
//!   always taken on returns along this path, never on raw price levels.

pub mod aligner;
pub mod correlation;
pub mod error;
pub mod transform;

pub use aligner::SeriesAligner;
pub use correlation::{CorrelationEngine, average_ranks, correlate_prices, pearson};
pub use error::CrossAssetError;
pub use transform::aligned_returns;
