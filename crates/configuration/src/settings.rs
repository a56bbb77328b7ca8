use crate::error::ConfigError;
use core_types::{AlignmentPolicy, CorrelationMethod, PriceField, RankKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections take their
/// `Default` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metrics: MetricsParams,
    pub correlation: CorrelationSettings,
    pub ranking: RankingSettings,
    pub chart: ChartSettings,
    pub data: DataSettings,
    pub universe: AssetUniverse,
}

/// Parameters of the single-asset risk metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsParams {
    /// Annual risk-free rate as a fraction (0.04 corresponds to 4%).
    pub risk_free_rate_annual: f64,
    /// Number of return periods in a year; 252 for daily trading data.
    pub periods_per_year: u32,
}

/// Choices for the cross-asset correlation view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSettings {
    pub method: CorrelationMethod,
    pub alignment: AlignmentPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    pub key: RankKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Moving-average window in periods.
    pub moving_average_window: usize,
}

/// Describes what the loaded price data represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Preferred price field. Adjusted close falls back to close when the data
    /// does not carry it for every asset.
    pub price_field: PriceField,
}

/// One tradable asset: its display name and its data-provider symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub symbol: String,
}

/// The explicit name/symbol table used by the loader and the reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUniverse {
    pub assets: Vec<AssetEntry>,
}

pub const MIN_MOVING_AVERAGE_WINDOW: usize = 10;
pub const MAX_MOVING_AVERAGE_WINDOW: usize = 200;

// --- Default Implementations ---

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            risk_free_rate_annual: 0.04,
            periods_per_year: 252,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { moving_average_window: 50 }
    }
}

impl Default for AssetUniverse {
    fn default() -> Self {
        let assets = [
            ("S&P 500 (Index)", "^GSPC"),
            ("NASDAQ (Index)", "^IXIC"),
            ("Gold (Commodity)", "GC=F"),
            ("Crude Oil (WTI)", "CL=F"),
            ("Euro/USD (FX)", "EURUSD=X"),
            ("Microsoft (Stock)", "MSFT"),
            ("Tesla (Stock)", "TSLA"),
        ]
        .into_iter()
        .map(|(name, symbol)| AssetEntry {
            name: name.to_string(),
            symbol: symbol.to_string(),
        })
        .collect();
        Self { assets }
    }
}

impl AssetUniverse {
    pub fn new(assets: Vec<AssetEntry>) -> Self {
        Self { assets }
    }

    pub fn name_for_symbol(&self, symbol: &str) -> Option<&str> {
        self.assets
            .iter()
            .find(|a| a.symbol == symbol)
            .map(|a| a.name.as_str())
    }

    pub fn symbol_for_name(&self, name: &str) -> Option<&str> {
        self.assets
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.symbol.as_str())
    }

    /// The display name for a symbol, or the symbol itself when unknown.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.name_for_symbol(symbol).unwrap_or(symbol)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        let mut symbols = HashSet::new();
        for asset in &self.assets {
            if asset.name.trim().is_empty() || asset.symbol.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "universe entries need a non-empty name and symbol".to_string(),
                ));
            }
            if !names.insert(asset.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate asset name '{}' in universe",
                    asset.name
                )));
            }
            if !symbols.insert(asset.symbol.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate symbol '{}' in universe",
                    asset.symbol
                )));
            }
        }
        Ok(())
    }
}

impl MetricsParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.risk_free_rate_annual.is_finite() || self.risk_free_rate_annual < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "risk_free_rate_annual must be a finite value >= 0, got {}",
                self.risk_free_rate_annual
            )));
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::ValidationError(
                "periods_per_year must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metrics.validate()?;

        let window = self.chart.moving_average_window;
        if !(MIN_MOVING_AVERAGE_WINDOW..=MAX_MOVING_AVERAGE_WINDOW).contains(&window) {
            return Err(ConfigError::ValidationError(format!(
                "moving_average_window must be between {} and {}, got {}",
                MIN_MOVING_AVERAGE_WINDOW, MAX_MOVING_AVERAGE_WINDOW, window
            )));
        }

        self.universe.validate()
    }
}
