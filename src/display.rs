use analytics::RiskMetricSet;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::CorrelationMatrix;
use ranking::RankingReport;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn fmt2(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Key-figure summary for a single asset.
pub fn metrics_table(
    asset: &str,
    metrics: &RiskMetricSet,
    window_annualized_pct: Option<f64>,
    moving_average: Option<(usize, Option<f64>)>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric".to_string(), asset.to_string()]);
    table.add_row(vec!["Total Return (%)".to_string(), fmt2(Some(metrics.total_return_pct))]);
    table.add_row(vec![
        "Annualized Return (%)".to_string(),
        fmt2(window_annualized_pct.or(metrics.annualized_return_pct)),
    ]);
    table.add_row(vec![
        "Annualized Volatility (%)".to_string(),
        fmt2(Some(metrics.annualized_volatility_pct)),
    ]);
    table.add_row(vec!["Max Drawdown (%)".to_string(), fmt2(Some(metrics.max_drawdown_pct))]);
    table.add_row(vec!["Sharpe Ratio".to_string(), fmt2(Some(metrics.sharpe_ratio))]);
    table.add_row(vec!["Current Price".to_string(), fmt2(Some(metrics.last_price))]);
    if let Some((window, value)) = moving_average {
        table.add_row(vec![format!("{window}-Period MA"), fmt2(value)]);
    }
    table.add_row(vec!["Observations".to_string(), metrics.observations.to_string()]);
    table
}

/// Square heatmap-style table of correlation coefficients.
pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = new_table();
    let mut header = vec![String::new()];
    header.extend(matrix.assets().iter().cloned());
    table.set_header(header);

    for (asset, row) in matrix.assets().iter().zip(matrix.rows()) {
        let mut cells = vec![asset.clone()];
        cells.extend(row.iter().map(|v| fmt2(*v)));
        table.add_row(cells);
    }
    table
}

/// Comparative risk metrics, one row per asset in rank order.
pub fn ranking_table(report: &RankingReport, risk_free_rate_annual: f64) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#".to_string(),
        "Asset".to_string(),
        "Symbol".to_string(),
        format!("Sharpe Ratio (RFR={:.1}%)", risk_free_rate_annual * 100.0),
        "Annualized Return (%)".to_string(),
        "Annualized Volatility (%)".to_string(),
        "Max Drawdown (%)".to_string(),
    ]);
    for row in &report.rows {
        table.add_row(vec![
            row.rank.to_string(),
            row.asset.clone(),
            row.symbol.clone().unwrap_or_default(),
            fmt2(Some(row.metrics.sharpe_ratio)),
            fmt2(row.metrics.annualized_return_pct),
            fmt2(Some(row.metrics.annualized_volatility_pct)),
            fmt2(Some(row.metrics.max_drawdown_pct)),
        ]);
    }
    table
}
