/// data.rs — Price file ingestion and ticker classification
///
/// Loads per-asset JSON price histories from a data directory. One file per
/// asset, named `<TICKER>.json`, holding an array of daily bars:
///
///   [ { "date": "2024-01-02", "close": 4742.83 }, ... ]
///
/// The ticker doubles as the classification key: provider suffixes mark FX
/// ("=X") and futures ("=F") contracts, a leading caret marks an index,
/// anything else is treated as equity. A small alias map shortens the
/// provider tickers to the display names used in reports.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use glob::glob;
use serde::Deserialize;
use tracing::{info, warn};

use vol_engine::interpret::AssetClass;
use vol_engine::pipeline::AssetInput;
use vol_engine::returns::{PricePoint, PriceSeries};

/// Provider ticker → report display name.
const TICKER_ALIASES: &[(&str, &str)] = &[
    ("MES=F", "ES"),
    ("MNQ=F", "NQ"),
    ("M2K=F", "RTY"),
    ("MYM=F", "YM"),
    ("EURUSD=X", "EURUSD"),
    ("BRL=X", "USDBRL"),
];

#[derive(Debug, Deserialize)]
struct RawBar {
    date: NaiveDate,
    close: f64,
}

/// Report display name for a provider ticker.
pub fn display_name(ticker: &str) -> String {
    for (from, to) in TICKER_ALIASES {
        if *from == ticker {
            return (*to).to_string();
        }
    }
    ticker.replace("=X", "").replace("=F", "")
}

/// Classify a provider ticker into an asset class.
pub fn classify_ticker(ticker: &str) -> AssetClass {
    let name = display_name(ticker);
    if ticker.contains("=X") || ticker.contains("USD") {
        AssetClass::Fx
    } else if ticker.contains("=F") || matches!(name.as_str(), "ES" | "NQ" | "RTY" | "YM") {
        AssetClass::Futures
    } else if ticker.starts_with('^') || matches!(name.as_str(), "SPX" | "NDX" | "RUT") {
        AssetClass::Index
    } else {
        AssetClass::Equity
    }
}

/// Parse one JSON price file into a chronological price series.
pub fn load_price_file(path: &Path) -> Result<PriceSeries> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading price file {}", path.display()))?;
    let bars: Vec<RawBar> = serde_json::from_str(&content)
        .with_context(|| format!("parsing price file {}", path.display()))?;

    let mut points: Vec<PricePoint> = bars
        .into_iter()
        .map(|b| PricePoint {
            timestamp: b.date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            close: b.close,
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);

    Ok(PriceSeries::new(points))
}

/// Load every `*.json` price file under `dir` into analysis inputs.
///
/// `only` restricts the batch to the named tickers (provider names or
/// display names) when non-empty. Unreadable files are skipped with a
/// warning, never fatal for the batch.
pub fn load_dir(dir: &Path, only: &[String]) -> Result<Vec<AssetInput>> {
    let pattern = dir.join("*.json");
    let mut inputs = Vec::new();

    for entry in glob(&pattern.to_string_lossy()).context("bad data directory pattern")? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("skipping unreadable path: {e}");
                continue;
            }
        };
        let ticker = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let asset = display_name(&ticker);

        if !only.is_empty() && !only.iter().any(|t| *t == ticker || *t == asset) {
            continue;
        }

        match load_price_file(&path) {
            Ok(prices) => {
                info!(ticker, asset, bars = prices.len(), "loaded price file");
                inputs.push(AssetInput {
                    asset,
                    class: classify_ticker(&ticker),
                    prices,
                });
            }
            Err(e) => warn!("skipping {}: {e:#}", path.display()),
        }
    }

    inputs.sort_by(|a, b| a.asset.cmp(&b.asset));
    Ok(inputs)
}
