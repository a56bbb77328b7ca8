use analytics::AnalyticsError;
use core_types::{CoreError, PriceField};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrossAssetError {
    /// Alignment left fewer than two assets or fewer than two common rows.
    /// `exclusive_assets` names the assets holding timestamps the others lack.
    #[error("Insufficient data after alignment: {reason}")]
    InsufficientData {
        reason: String,
        exclusive_assets: Vec<String>,
    },

    #[error("Asset '{0}' was supplied more than once")]
    DuplicateAsset(String),

    #[error("Cannot align '{first_asset}' ({first}) with '{other_asset}' ({other}): price fields differ")]
    MixedPriceFields {
        first_asset: String,
        first: PriceField,
        other_asset: String,
        other: PriceField,
    },

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
