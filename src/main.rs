use analytics::{MetricsEngine, MetricsReport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::{AlignedPriceMatrix, ReturnMatrix, ReturnSeries};
use pipeline::{PortfolioAggregator, PriceAligner, RawPriceTable, ReturnCalculator};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Meridian portfolio analytics application.
fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(&cli.config, args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A deterministic portfolio performance & risk analytics pipeline.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the run configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align prices, derive returns and emit the full metrics bundle.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Directory holding one raw price table per ticker ("{TICKER}.json").
    #[arg(long)]
    prices: PathBuf,

    /// File to write the JSON bundle to; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

/// Everything downstream reporting collaborators consume, in one bundle:
/// the aligned matrix for price comparison, the return series for the
/// cumulative-return/drawdown/distribution/correlation visuals, and the
/// metric sets for tabular summaries.
#[derive(Serialize)]
struct ReportBundle {
    aligned_prices: AlignedPriceMatrix,
    asset_returns: ReturnMatrix,
    portfolio_returns: ReturnSeries,
    portfolio_metrics: MetricsReport,
    asset_metrics: BTreeMap<String, MetricsReport>,
}

/// Runs the whole pipeline for one configured portfolio. Any core error
/// aborts the run; a partial bundle is never written.
fn handle_report(config_path: &str, args: ReportArgs) -> Result<()> {
    let config = configuration::load_config(config_path)?;
    let tables = load_tables(&config, &args.prices)?;

    let aligned_prices = PriceAligner::new().align(&tables)?;
    let asset_returns = ReturnCalculator::new().calculate(&aligned_prices)?;
    let portfolio_returns =
        PortfolioAggregator::new().aggregate(&asset_returns, &config.weight_vector())?;

    let engine = MetricsEngine::new(
        config.analytics.trading_days_per_year,
        config.analytics.risk_free_rate,
        config.analytics.var_confidence_levels.clone(),
    );

    let portfolio_metrics = engine.calculate(&portfolio_returns)?;
    let mut asset_metrics = BTreeMap::new();
    for ticker in asset_returns.tickers() {
        let series = asset_returns
            .series(ticker)
            .with_context(|| format!("no return column for ticker '{ticker}'"))?;
        asset_metrics.insert(ticker.clone(), engine.calculate(&series)?);
    }

    for (name, value) in portfolio_metrics.entries() {
        info!(metric = name.as_str(), value, "portfolio");
    }

    let bundle = ReportBundle {
        aligned_prices,
        asset_returns,
        portfolio_returns,
        portfolio_metrics,
        asset_metrics,
    };
    let json = serde_json::to_string_pretty(&bundle)?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("writing report bundle to {}", path.display()))?;
            info!(path = %path.display(), "report bundle written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Reads one raw provider table per configured ticker. A missing or
/// malformed file aborts the run up front rather than producing a bundle
/// with silently absent assets.
fn load_tables(config: &Config, dir: &Path) -> Result<BTreeMap<String, RawPriceTable>> {
    let mut tables = BTreeMap::new();
    for ticker in &config.portfolio.tickers {
        let path = dir.join(format!("{ticker}.json"));
        let payload = fs::read_to_string(&path)
            .with_context(|| format!("reading price table {}", path.display()))?;
        let table: RawPriceTable = serde_json::from_str(&payload)
            .with_context(|| format!("parsing price table {}", path.display()))?;
        tables.insert(ticker.clone(), table);
    }
    Ok(tables)
}
