use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use configuration::AssetUniverse;
use core_types::{PriceField, PricePoint, PriceSeries};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// One bar as delivered by the market-data provider.
///
/// Days an instrument did not trade may carry `null` prices; they are dropped.
#[derive(Debug, Clone, Deserialize)]
struct Bar {
    timestamp: String,
    close: Option<f64>,
    #[serde(default)]
    adj_close: Option<f64>,
}

/// Price series read from a file, all built from the same price field.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub field: PriceField,
    /// `(display name, series)` in file order.
    pub series: Vec<(String, PriceSeries)>,
}

/// Reads a JSON object mapping provider symbol to an array of bars.
pub fn load_prices(path: &Path, preferred: PriceField, universe: &AssetUniverse) -> Result<LoadedPrices> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read price file {}", path.display()))?;
    parse_prices(&raw, preferred, universe)
        .with_context(|| format!("Failed to parse price file {}", path.display()))
}

pub fn parse_prices(raw: &str, preferred: PriceField, universe: &AssetUniverse) -> Result<LoadedPrices> {
    let document: Map<String, Value> = serde_json::from_str(raw)?;
    if document.is_empty() {
        bail!("price file contains no assets");
    }

    let mut assets = Vec::with_capacity(document.len());
    for (symbol, bars) in document {
        let bars: Vec<Bar> = serde_json::from_value(bars)
            .with_context(|| format!("Malformed bars for '{symbol}'"))?;
        assets.push((symbol, bars));
    }

    let field = resolve_field(preferred, &assets);

    let mut series = Vec::with_capacity(assets.len());
    for (symbol, bars) in assets {
        let total = bars.len();
        let mut points = Vec::with_capacity(total);
        for bar in bars {
            let price = match field {
                PriceField::AdjustedClose => bar.adj_close,
                PriceField::Close => bar.close,
            };
            if let Some(price) = price {
                points.push(PricePoint {
                    timestamp: parse_timestamp(&bar.timestamp)
                        .with_context(|| format!("Bad timestamp for '{symbol}'"))?,
                    price,
                });
            }
        }
        if points.len() < total {
            tracing::debug!(symbol = %symbol, dropped = total - points.len(), "Dropped bars without a price.");
        }
        points.sort_by_key(|p| p.timestamp);

        let name = universe.display_name(&symbol).to_string();
        let built = PriceSeries::new(points, field)
            .with_context(|| format!("Invalid price history for '{symbol}'"))?;
        series.push((name, built));
    }

    tracing::info!(assets = series.len(), field = %field, "Loaded price data.");
    Ok(LoadedPrices { field, series })
}

/// Adjusted closes are only used when every bar of every asset has one, so
/// that adjusted and unadjusted prices are never mixed.
fn resolve_field(preferred: PriceField, assets: &[(String, Vec<Bar>)]) -> PriceField {
    if preferred == PriceField::Close {
        return PriceField::Close;
    }
    let missing: Vec<&str> = assets
        .iter()
        .filter(|(_, bars)| bars.iter().any(|b| b.adj_close.is_none()))
        .map(|(symbol, _)| symbol.as_str())
        .collect();
    if missing.is_empty() {
        PriceField::AdjustedClose
    } else {
        tracing::warn!(
            symbols = ?missing,
            "Adjusted close missing, falling back to close for every asset."
        );
        PriceField::Close
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("'{s}' is neither RFC 3339 nor YYYY-MM-DD"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Restricts a series to `[from, to]` (inclusive calendar dates).
pub fn clip(series: &PriceSeries, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<PriceSeries> {
    let points = series
        .points()
        .iter()
        .filter(|p| from.is_none_or(|d| p.timestamp.date_naive() >= d))
        .filter(|p| to.is_none_or(|d| p.timestamp.date_naive() <= d))
        .copied()
        .collect();
    Ok(PriceSeries::new(points, series.field())?)
}
