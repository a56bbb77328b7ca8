use analytics::RiskMetricSet;
use configuration::AssetUniverse;
use core_types::RankKey;
use serde::Serialize;
use std::cmp::Ordering;

/// One line of a comparative table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based position in the report.
    pub rank: usize,
    pub asset: String,
    /// Data-provider symbol, when the universe knows the asset.
    pub symbol: Option<String>,
    pub metrics: RiskMetricSet,
}

/// Per-asset metric sets sorted for presentation.
///
/// Rows are ordered by the chosen key, highest first; equal keys fall back to
/// the asset name in ascending order. No metric is recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub key: RankKey,
    pub rows: Vec<RankedRow>,
}

impl RankingReport {
    pub fn build(entries: Vec<(String, RiskMetricSet)>, key: RankKey) -> Self {
        let mut entries = entries;
        entries.sort_by(|(name_a, a), (name_b, b)| {
            compare_desc(metric_value(a, key), metric_value(b, key)).then_with(|| name_a.cmp(name_b))
        });

        let rows = entries
            .into_iter()
            .enumerate()
            .map(|(i, (asset, metrics))| RankedRow {
                rank: i + 1,
                asset,
                symbol: None,
                metrics,
            })
            .collect();

        Self { key, rows }
    }

    /// Fills in provider symbols from an explicit asset universe.
    pub fn with_universe(mut self, universe: &AssetUniverse) -> Self {
        for row in &mut self.rows {
            row.symbol = universe.symbol_for_name(&row.asset).map(str::to_string);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn top(&self) -> Option<&RankedRow> {
        self.rows.first()
    }
}

/// The value a report sorts by. Only the annualized return can be undefined.
pub fn metric_value(metrics: &RiskMetricSet, key: RankKey) -> Option<f64> {
    match key {
        RankKey::SharpeRatio => Some(metrics.sharpe_ratio),
        RankKey::TotalReturn => Some(metrics.total_return_pct),
        RankKey::AnnualizedReturn => metrics.annualized_return_pct,
        RankKey::AnnualizedVolatility => Some(metrics.annualized_volatility_pct),
        RankKey::MaxDrawdown => Some(metrics.max_drawdown_pct),
    }
}

/// Descending order with undefined values last.
fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
