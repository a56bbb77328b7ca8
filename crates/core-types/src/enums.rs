use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which price field a series was built from.
///
/// Adjusted and unadjusted closes must never be compared across assets, so
/// every `PriceSeries` carries the field it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    AdjustedClose,
    Close,
}

/// The estimator used by the correlation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMethod {
    /// Linear correlation on pairwise-complete observations.
    #[default]
    Pearson,
    /// Pearson correlation of average ranks, on complete rows only.
    Spearman,
}

/// How timestamps from several series are combined into one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Keep only timestamps present in every series.
    #[default]
    Inner,
    /// Keep every timestamp; gaps become explicit missing markers.
    Outer,
    /// Keep every timestamp; gaps take the asset's previous observation.
    OuterForwardFill,
}

/// The metric a ranking report is sorted by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    #[default]
    SharpeRatio,
    TotalReturn,
    AnnualizedReturn,
    AnnualizedVolatility,
    MaxDrawdown,
}

impl PriceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::AdjustedClose => "adjusted_close",
            PriceField::Close => "close",
        }
    }
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
        }
    }
}

impl AlignmentPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentPolicy::Inner => "inner",
            AlignmentPolicy::Outer => "outer",
            AlignmentPolicy::OuterForwardFill => "outer_forward_fill",
        }
    }
}

impl RankKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankKey::SharpeRatio => "sharpe_ratio",
            RankKey::TotalReturn => "total_return",
            RankKey::AnnualizedReturn => "annualized_return",
            RankKey::AnnualizedVolatility => "annualized_volatility",
            RankKey::MaxDrawdown => "max_drawdown",
        }
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| CoreError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_display_from_str!(PriceField, "price field", [PriceField::AdjustedClose, PriceField::Close]);
impl_display_from_str!(
    CorrelationMethod,
    "correlation method",
    [CorrelationMethod::Pearson, CorrelationMethod::Spearman]
);
impl_display_from_str!(
    AlignmentPolicy,
    "alignment policy",
    [AlignmentPolicy::Inner, AlignmentPolicy::Outer, AlignmentPolicy::OuterForwardFill]
);
impl_display_from_str!(
    RankKey,
    "rank key",
    [
        RankKey::SharpeRatio,
        RankKey::TotalReturn,
        RankKey::AnnualizedReturn,
        RankKey::AnnualizedVolatility,
        RankKey::MaxDrawdown,
    ]
);
