use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AssetEntry, AssetUniverse, ChartSettings, Config, CorrelationSettings, DataSettings,
    MetricsParams, RankingSettings,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `MARKET_LENS_METRICS__RISK_FREE_RATE_ANNUAL=0.03`.
pub const ENV_PREFIX: &str = "MARKET_LENS";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at
/// `path` (skipped when absent), then `MARKET_LENS_*` environment variables.
/// The merged result is validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults.");
    }

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

/// Parses configuration from an in-memory TOML document, without consulting
/// the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
