/// reporting.rs — Report generation (TXT, CSV, JSON)
///
/// Three export formats from one batch outcome:
///
/// - TXT: the full human-readable report — winners table with automatic
///   interpretation, selection-criteria notes, and the legend blocks.
/// - CSV: flat parameter table for downstream consumption, semicolon
///   separated (decimal-comma locales open it without mangling).
/// - JSON: machine-readable dump of the summary rows plus failures.
///
/// Assets whose analysis failed still appear in every format, carried as
/// sentinel rows so the output always covers the requested batch.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde_json::json;
use tracing::info;

use vol_engine::pipeline::{AssetSummary, BatchOutcome};
use vol_engine::select::SelectionResult;

const RULE_WIDTH: usize = 160;

/// Batch-level context printed in the report header.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    pub generated_at: DateTime<Utc>,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub trading_days: usize,
}

impl AnalysisMetadata {
    pub fn calendar_days(&self) -> i64 {
        match (self.period_start, self.period_end) {
            (Some(s), Some(e)) => (e - s).num_days(),
            _ => 0,
        }
    }
}

/// Write all three report files into `out_dir`.
pub fn write_reports(
    outcome: &BatchOutcome,
    meta: &AnalysisMetadata,
    out_dir: &Path,
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let stamp = meta.generated_at.format("%Y-%m-%d");

    let summaries = outcome.summaries();
    let failures: Vec<(String, String)> = outcome
        .failures
        .iter()
        .map(|(asset, e)| (asset.clone(), e.to_string()))
        .collect();

    let txt_path = out_dir.join(format!("VOLATILITY_ANALYSIS_{stamp}.txt"));
    fs::write(&txt_path, render_txt(&summaries, &failures, meta))
        .with_context(|| format!("writing {}", txt_path.display()))?;

    let csv_path = out_dir.join(format!("MODEL_PARAMETERS_{stamp}.csv"));
    let mut df = parameter_frame(&summaries, &failures)?;
    let mut file = fs::File::create(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b';')
        .finish(&mut df)
        .context("writing parameter CSV")?;

    let json_path = out_dir.join(format!("VOLATILITY_ANALYSIS_{stamp}.json"));
    let payload = json!({
        "generated_at": meta.generated_at.to_rfc3339(),
        "trading_days": meta.trading_days,
        "results": summaries,
        "failures": failures.iter().map(|(a, e)| json!({"asset": a, "error": e})).collect::<Vec<_>>(),
    });
    fs::write(&json_path, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("writing {}", json_path.display()))?;

    info!(
        txt = %txt_path.display(),
        csv = %csv_path.display(),
        json = %json_path.display(),
        "reports written"
    );
    Ok(())
}

/// Render the full TXT report.
pub fn render_txt(
    summaries: &[AssetSummary],
    failures: &[(String, String)],
    meta: &AnalysisMetadata,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push("VOLATILITY MODEL ANALYZER — FULL ANALYSIS + PER-ASSET-CLASS RULES".into());
    lines.push(format!(
        "Analysis date: {}",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if let (Some(s), Some(e)) = (meta.period_start, meta.period_end) {
        lines.push(format!(
            "Period analyzed: {} -> {}",
            s.format("%Y-%m-%d"),
            e.format("%Y-%m-%d")
        ));
    }
    lines.push(format!(
        "Calendar days: {} | Trading days: {} (~ {:.2} years)\n",
        meta.calendar_days(),
        meta.trading_days,
        meta.trading_days as f64 / 252.0
    ));

    lines.push("WINNING MODELS + AUTOMATIC INTERPRETATION".into());
    lines.push(rule.clone());
    lines.push(format!(
        "{:<10} {:<8} {:<18} {:<10} {:<7} {:<13} {:<11} {:<11} {:<11} {:<10} Interpretation",
        "Asset", "Class", "Model", "AIC", "LB", "Omega", "Alpha", "Beta", "Gamma", "Status"
    ));
    lines.push(rule.clone());

    for s in summaries {
        let status = if s.lb_pvalue > 0.05 { "EXCELLENT" } else { "GOOD" };
        lines.push(format!(
            "{:<10} {:<8} {:<18} {:<10.1} {:<7.3} {:<13.6} {:<11.6} {:<11.6} {:<11.6} {:<10} {}",
            s.asset,
            s.asset_class,
            s.model,
            s.aic,
            s.lb_pvalue,
            s.omega,
            s.alpha_total,
            s.beta_total,
            s.gamma,
            status,
            s.tags.join(" | ")
        ));
    }
    for (asset, error) in failures {
        lines.push(format!(
            "{:<10} {:<8} {:<18} {:<10.1} {:<7.3} {:<13.6} {:<11.6} {:<11.6} {:<11.6} {:<10} {}",
            asset,
            "-",
            SelectionResult::SENTINEL_NAME,
            SelectionResult::SENTINEL_AIC,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            "FAILED",
            error
        ));
    }
    lines.push(format!("{rule}\n"));

    lines.push("MODEL SELECTION CRITERIA".into());
    lines.push(rule.clone());
    lines.push("AIC (Akaike Information Criterion)".into());
    lines.push("    - Lower is better; penalizes parameter count to avoid overfitting".into());
    lines.push("    - Candidates passing the whiteness test are preferred outright;".into());
    lines.push("      AIC only breaks ties within the same adequacy tier\n".into());
    lines.push("LB p-val (Ljung-Box on squared standardized residuals)".into());
    lines.push("    - p > 0.05: no ARCH structure left, the fit is adequate".into());
    lines.push("    - p < 0.05: structure remains, the model missed dynamics".into());
    lines.push("    - Status EXCELLENT = p > 0.05\n".into());

    lines.push("PARAMETER GUIDE".into());
    lines.push(rule.clone());
    lines.push("Omega  -> long-run variance intercept".into());
    lines.push("          GARCH/GJR: always positive".into());
    lines.push("          EGARCH: log scale, may be NEGATIVE (downside leverage)\n".into());
    lines.push("Alpha  -> total impact of recent shocks (sum over all lag orders)".into());
    lines.push("          high alpha: volatility reacts sharply to news\n".into());
    lines.push("Beta   -> total volatility persistence (sum over all lag orders)".into());
    lines.push("          beta near 1: shocks to volatility decay very slowly\n".into());
    lines.push("Gamma  -> asymmetry (leverage), family-adjusted:".into());
    lines.push("          EGARCH reports gamma, GJR reports gamma/2, GARCH reports 0\n".into());

    lines.push("INTERPRETATION LEGEND".into());
    lines.push(rule.clone());
    lines.push("CLASSIC FX REGIME              -> FX + GARCH + alpha<0.07 + beta>0.90".into());
    lines.push("TECHNICAL FUTURES VOLATILITY   -> FUTURES + GARCH + alpha>0.08".into());
    lines.push("MATURE EQUITY PROFILE          -> EQUITY + GARCH + alpha<0.07".into());
    lines.push("VOLATILE EQUITY PROFILE        -> EQUITY + GARCH + alpha>0.15".into());
    lines.push("DOWNSIDE SHOCKS AMPLIFY VOL    -> EGARCH + omega < -0.5".into());
    lines.push("LONG VOLATILITY MEMORY         -> beta > 0.98".into());
    lines.push("PANIC-PRONE                    -> EGARCH + omega < -0.3".into());
    lines.push(rule);

    lines.join("\n")
}

/// Flat parameter table, one row per asset, sentinel rows for failures.
fn parameter_frame(
    summaries: &[AssetSummary],
    failures: &[(String, String)],
) -> Result<DataFrame> {
    let n = summaries.len() + failures.len();
    let mut asset = Vec::with_capacity(n);
    let mut model = Vec::with_capacity(n);
    let mut omega = Vec::with_capacity(n);
    let mut alpha = Vec::with_capacity(n);
    let mut beta = Vec::with_capacity(n);
    let mut gamma = Vec::with_capacity(n);
    let mut aic = Vec::with_capacity(n);
    let mut lb = Vec::with_capacity(n);
    let mut long_run = Vec::with_capacity(n);
    let mut current = Vec::with_capacity(n);

    for s in summaries {
        asset.push(s.asset.clone());
        model.push(s.model.clone());
        omega.push(s.omega);
        alpha.push(s.alpha_total);
        beta.push(s.beta_total);
        gamma.push(s.gamma);
        aic.push(s.aic);
        lb.push(s.lb_pvalue);
        long_run.push(s.long_run_vol);
        current.push(s.current_vol);
    }
    for (a, _) in failures {
        asset.push(a.clone());
        model.push(SelectionResult::SENTINEL_NAME.to_string());
        omega.push(0.0);
        alpha.push(0.0);
        beta.push(0.0);
        gamma.push(0.0);
        aic.push(SelectionResult::SENTINEL_AIC);
        lb.push(0.0);
        long_run.push(0.0);
        current.push(0.0);
    }

    df! {
        "Asset" => asset,
        "Model" => model,
        "Omega" => omega,
        "Alpha_Total" => alpha,
        "Beta_Total" => beta,
        "Gamma" => gamma,
        "AIC" => aic,
        "LB_pval" => lb,
        "LongRun_Vol" => long_run,
        "Current_Vol" => current,
    }
    .context("building parameter frame")
}
