/// main.rs — Volatility Analyzer Entry Point
///
/// Batch front-end over the volatility engine: loads per-asset price files,
/// fits the candidate catalogue for each, selects the winning model and
/// writes the TXT/CSV/JSON reports.
///
/// Usage:
///   cargo run --bin vol_analyzer -- --data-dir ./data --output-dir ./reports
///   cargo run --bin vol_analyzer -- --asset EURUSD --asset ES --verbose
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vol_engine::pipeline::{run_batch, AssetInput, BatchOutcome};
use vol_engine::EngineConfig;

mod data;
mod reporting;

#[derive(Parser)]
#[command(name = "vol_analyzer")]
#[command(about = "Multi-model volatility analyzer - fits a GARCH/EGARCH/GJR catalogue per asset")]
#[command(version)]
struct Cli {
    /// Directory holding per-asset JSON price files
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Output directory for reports
    #[arg(short, long, default_value = "./reports")]
    output_dir: PathBuf,

    /// Restrict the batch to these assets (provider or display names)
    #[arg(short, long)]
    asset: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = EngineConfig::from_env()?;

    let inputs = data::load_dir(&cli.data_dir, &cli.asset)?;
    if inputs.is_empty() {
        return Err(anyhow!(
            "no price files found in {}",
            cli.data_dir.display()
        ));
    }
    info!(assets = inputs.len(), "starting batch analysis");

    let meta = reporting::AnalysisMetadata {
        generated_at: Utc::now(),
        period_start: inputs
            .iter()
            .filter_map(|i| i.prices.first_timestamp())
            .min(),
        period_end: inputs
            .iter()
            .filter_map(|i| i.prices.last_timestamp())
            .max(),
        trading_days: inputs.iter().map(|i| i.prices.len()).max().unwrap_or(0),
    };

    let outcome = run_batch(&inputs, &cfg);
    reporting::write_reports(&outcome, &meta, &cli.output_dir)?;
    print_summary(&inputs, &outcome);

    Ok(())
}

fn print_summary(inputs: &[AssetInput], outcome: &BatchOutcome) {
    println!("{}", "=".repeat(60));
    println!("VOLATILITY ANALYSIS SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Assets analyzed: {}", inputs.len());
    println!("Usable models:   {}", outcome.reports.len());
    println!("Failures:        {}", outcome.failures.len());
    println!();
    for r in &outcome.reports {
        println!(
            "  {:<10} {:<18} long-run vol {:>6.1}%  current vol {:>6.1}%",
            r.asset,
            r.selection.display_name(),
            r.volatility.long_run * 100.0,
            r.volatility.current * 100.0
        );
    }
    for (asset, e) in &outcome.failures {
        println!("  {asset:<10} SKIPPED: {e}");
    }
    println!("{}", "=".repeat(60));
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(&cli) {
        error!("analysis failed: {e:#}");
        std::process::exit(1);
    }
}
