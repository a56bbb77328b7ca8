use analytics::{AnalyticsEngine, annualize_return, moving_average};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::{AlignmentPolicy, CorrelationMethod, PriceSeries, RankKey};
use cross_asset::correlate_prices;
use ranking::RankingReport;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod display;
mod loader;

/// The main entry point for the Market Lens analytics tool.
fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Metrics(args) => handle_metrics(args, &config),
        Commands::Correlate(args) => handle_correlate(args, &config),
        Commands::Rank(args) => handle_rank(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Risk, return and correlation analytics for multi-asset price histories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Key performance metrics for a single asset.
    Metrics(MetricsArgs),
    /// Correlation matrix of the assets' returns.
    Correlate(CorrelateArgs),
    /// Compare assets in a table sorted by a risk metric.
    Rank(RankArgs),
}

/// Options shared by every command that reads price data.
#[derive(Parser)]
struct InputArgs {
    /// JSON file mapping provider symbols to arrays of bars.
    #[arg(long, short)]
    input: PathBuf,

    /// First date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct MetricsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Asset display name or symbol. Defaults to the first asset in the file.
    #[arg(long, short)]
    asset: Option<String>,
}

#[derive(Parser)]
struct CorrelateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Correlation estimator. Overrides the configuration file.
    #[arg(long, value_enum)]
    method: Option<CorrelationMethod>,

    /// How calendars of different assets are combined.
    #[arg(long, value_enum)]
    policy: Option<AlignmentPolicy>,

    /// Print the matrix as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct RankArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Metric to sort by, highest first.
    #[arg(long, value_enum)]
    key: Option<RankKey>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads, validates the date window and clips every series to it.
fn load_window(args: &InputArgs, config: &Config) -> Result<Vec<(String, PriceSeries)>> {
    check_window(args)?;

    let loaded = loader::load_prices(&args.input, config.data.price_field, &config.universe)?;
    loaded
        .series
        .into_iter()
        .map(|(name, series)| Ok((name, loader::clip(&series, args.from, args.to)?)))
        .collect()
}

/// A same-day window is allowed; annualization then counts it as one day.
fn check_window(args: &InputArgs) -> Result<()> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            bail!("Start date {from} must not be after the end date {to}.");
        }
    }
    Ok(())
}

/// Calendar days of the requested window, when both ends are given.
fn window_days(args: &InputArgs) -> Option<i64> {
    match (args.from, args.to) {
        (Some(from), Some(to)) => Some((to - from).num_days()),
        _ => None,
    }
}

fn handle_metrics(args: MetricsArgs, config: &Config) -> Result<()> {
    let series = load_window(&args.input, config)?;

    let (name, prices) = match &args.asset {
        Some(wanted) => series
            .iter()
            .find(|(name, _)| {
                name == wanted || config.universe.symbol_for_name(name) == Some(wanted.as_str())
            })
            .with_context(|| format!("Asset '{wanted}' not found in {}", args.input.input.display()))?,
        None => series.first().context("Price file contains no assets")?,
    };

    let engine = AnalyticsEngine::new(config.metrics)?;
    let metrics = engine
        .compute(prices)
        .with_context(|| format!("Could not compute metrics for '{name}'"))?;

    // The dashboard annualizes over the selected window rather than the data span.
    let window_annualized =
        window_days(&args.input).map(|days| annualize_return(metrics.total_return_pct, days));

    let window = config.chart.moving_average_window;
    let last_ma = moving_average(prices, window)?
        .last()
        .and_then(|p| p.value);

    tracing::info!(asset = %name, observations = metrics.observations, "Computed risk metrics.");
    println!(
        "{}",
        display::metrics_table(name, &metrics, window_annualized, Some((window, last_ma)))
    );
    Ok(())
}

fn handle_correlate(args: CorrelateArgs, config: &Config) -> Result<()> {
    let series = load_window(&args.input, config)?;
    let method = args.method.unwrap_or(config.correlation.method);
    let policy = args.policy.unwrap_or(config.correlation.alignment);

    let matrix = correlate_prices(&series, policy, method)
        .context("Could not compute the correlation matrix")?;

    if !matrix.has_defined_pairs() {
        tracing::warn!(%method, %policy, "No asset pair has a defined correlation.");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
    } else {
        println!("Correlation of returns ({method}, {policy} alignment)");
        println!("{}", display::correlation_table(&matrix));
    }
    Ok(())
}

fn handle_rank(args: RankArgs, config: &Config) -> Result<()> {
    let series = load_window(&args.input, config)?;
    let key = args.key.unwrap_or(config.ranking.key);
    let engine = AnalyticsEngine::new(config.metrics)?;
    let window = window_days(&args.input);

    let mut entries = Vec::with_capacity(series.len());
    for (name, prices) in &series {
        // One unusable asset should not hide the others.
        match engine.compute(prices) {
            Ok(mut metrics) => {
                if let Some(days) = window {
                    let annualized = annualize_return(metrics.total_return_pct, days);
                    metrics.annualized_return_pct = Some(annualized).filter(|v| v.is_finite());
                }
                entries.push((name.clone(), metrics));
            }
            Err(e) => tracing::warn!(asset = %name, error = %e, "Skipping asset."),
        }
    }

    if entries.is_empty() {
        bail!("No asset had enough valid data to rank.");
    }

    let report = RankingReport::build(entries, key).with_universe(&config.universe);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Assets ranked by {key}");
        println!(
            "{}",
            display::ranking_table(&report, config.metrics.risk_free_rate_annual)
        );
    }
    Ok(())
}
