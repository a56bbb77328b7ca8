//! # Market Lens Analytics Engine
//!
//! Single-asset risk and performance statistics over in-memory price series.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O, no logging, no shared state. Every function is a
//!   deterministic transform of its inputs.
//! - **No silent NaN:** invalid prices, too-short series and non-finite
//!   results are reported through `AnalyticsError`. The one deliberate
//!   exception is the Sharpe ratio of a zero-volatility series, which is
//!   defined as `0.0`.
//!
//! ## Public API
//!
//! - `compute_returns`: price series to simple returns.
//! - `drawdown_series` / `max_drawdown_pct`: running-peak drawdowns.
//! - `AnalyticsEngine`: total return, annualized volatility, max drawdown,
//!   Sharpe ratio and annualized return in one `RiskMetricSet`.
//! - `moving_average`: simple moving-average overlay.

pub mod drawdown;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod report;
pub mod returns;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use drawdown::{drawdown_series, max_drawdown_pct};
pub use engine::{AnalyticsEngine, annualize_return, sharpe_ratio};
pub use error::AnalyticsError;
pub use indicators::{MovingAveragePoint, moving_average};
pub use report::RiskMetricSet;
pub use returns::{compute_returns, simple_return, validate_prices};
