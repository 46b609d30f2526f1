/// pipeline.rs — Per-asset orchestration and the parallel batch runner
///
/// Chains the stages end to end for one asset:
///
///   prices → returns → candidate sweep → selection → normalization
///          → volatility estimation → interpretation
///
/// A batch fans assets out over the rayon pool; a failed asset is recorded
/// and never aborts its siblings. Within one asset the candidate fits run
/// sequentially in catalogue order.
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::interpret::{classify, AssetClass, RiskTag};
use crate::models::CATALOGUE;
use crate::params::{normalize, NormalizedParameters};
use crate::returns::{PriceSeries, ReturnSeries};
use crate::select::{select_model, SelectionResult};
use crate::volatility::{estimate, VolatilityEstimate};

/// One asset queued for analysis.
#[derive(Debug, Clone)]
pub struct AssetInput {
    pub asset: String,
    pub class: AssetClass,
    pub prices: PriceSeries,
}

/// Full per-asset result, everything the exporters need.
#[derive(Debug, Clone)]
pub struct AssetReport {
    pub asset: String,
    pub class: AssetClass,
    pub n_obs: usize,
    pub selection: SelectionResult,
    pub params: NormalizedParameters,
    pub volatility: VolatilityEstimate,
    pub tags: Vec<RiskTag>,
    /// Fitted conditional variance path, de-scaled to real return units.
    pub variance_path: Vec<f64>,
}

/// Flat summary row for tabular export.
#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub asset: String,
    pub asset_class: String,
    pub model: String,
    pub aic: f64,
    pub lb_pvalue: f64,
    pub omega: f64,
    pub alpha_total: f64,
    pub beta_total: f64,
    /// Family-adjusted asymmetry as it enters the long-run variance.
    pub gamma: f64,
    pub long_run_vol: f64,
    pub current_vol: f64,
    pub n_obs: usize,
    pub tags: Vec<String>,
}

impl AssetReport {
    pub fn summary(&self) -> AssetSummary {
        let family = self.selection.best.as_ref().map(|b| b.spec.family);
        AssetSummary {
            asset: self.asset.clone(),
            asset_class: self.class.to_string(),
            model: self.selection.display_name().to_string(),
            aic: self.selection.aic(),
            lb_pvalue: self.selection.lb_pvalue(),
            omega: self.params.omega,
            alpha_total: self.params.alpha_total,
            beta_total: self.params.beta_total,
            gamma: family.map_or(0.0, |f| self.params.gamma_adjusted(f)),
            long_run_vol: self.volatility.long_run,
            current_vol: self.volatility.current,
            n_obs: self.n_obs,
            tags: self.tags.iter().map(|t| t.label().to_string()).collect(),
        }
    }
}

/// Analyze one asset from raw prices.
pub fn analyze_prices(input: &AssetInput, cfg: &EngineConfig) -> Result<AssetReport, EngineError> {
    let returns = ReturnSeries::from_prices(&input.prices, cfg)?;
    analyze_returns(&input.asset, input.class, &returns, cfg)
}

/// Analyze one asset from an already-transformed return series.
pub fn analyze_returns(
    asset: &str,
    class: AssetClass,
    returns: &ReturnSeries,
    cfg: &EngineConfig,
) -> Result<AssetReport, EngineError> {
    info!(asset, n_obs = returns.len(), "analyzing");

    let selection = select_model(returns, &CATALOGUE, cfg);
    let Some(best) = selection.best.as_ref() else {
        return Err(EngineError::NoUsableModel {
            candidates: selection.candidates.len(),
        });
    };

    let family = best.spec.family;
    let params = normalize(&best.coefficients());
    let path = best
        .model()
        .map(|m| m.conditional_variance.as_slice())
        .unwrap_or(&[]);
    let volatility = estimate(&params, family, path, returns.scale(), cfg);
    let tags = classify(family, &params, class, &cfg.interpret);

    // De-scale the variance path once, alongside the volatility inversion.
    let s2 = returns.scale() * returns.scale();
    let variance_path = path.iter().map(|v| v / s2).collect();

    Ok(AssetReport {
        asset: asset.to_string(),
        class,
        n_obs: returns.len(),
        selection,
        params,
        volatility,
        tags,
        variance_path,
    })
}

/// Batch outcome: successful reports plus per-asset failures, both in input
/// order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub reports: Vec<AssetReport>,
    pub failures: Vec<(String, EngineError)>,
}

impl BatchOutcome {
    pub fn summaries(&self) -> Vec<AssetSummary> {
        self.reports.iter().map(AssetReport::summary).collect()
    }
}

/// Analyze a batch of assets in parallel.
pub fn run_batch(inputs: &[AssetInput], cfg: &EngineConfig) -> BatchOutcome {
    let results: Vec<(String, Result<AssetReport, EngineError>)> = inputs
        .par_iter()
        .map(|input| (input.asset.clone(), analyze_prices(input, cfg)))
        .collect();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (asset, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!(asset, "asset skipped: {e}");
                failures.push((asset, e));
            }
        }
    }
    info!(
        ok = reports.len(),
        failed = failures.len(),
        "batch complete"
    );
    BatchOutcome { reports, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::testutil::simulate_garch11;
    use crate::returns::PricePoint;

    fn prices_from_returns(returns: &[f64]) -> PriceSeries {
        let mut close = 100.0f64;
        let mut points = vec![PricePoint {
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            close,
        }];
        for (i, r) in returns.iter().enumerate() {
            close *= (r / 100.0).exp();
            points.push(PricePoint {
                timestamp: Utc.timestamp_opt(86_400 * (i as i64 + 1), 0).unwrap(),
                close,
            });
        }
        PriceSeries::new(points)
    }

    fn garch_input(asset: &str, class: AssetClass, seed: u64) -> AssetInput {
        // Percent-unit DGP so the 100× scaling round-trips.
        let r = simulate_garch11(900, 0.02, 0.10, 0.85, seed);
        AssetInput {
            asset: asset.to_string(),
            class,
            prices: prices_from_returns(&r),
        }
    }

    #[test]
    fn full_pipeline_produces_coherent_report() {
        let cfg = EngineConfig::default();
        let input = garch_input("TEST", AssetClass::Equity, 3);
        let report = analyze_prices(&input, &cfg).unwrap();

        assert_eq!(report.n_obs, 900);
        assert!(report.selection.is_usable());
        assert!(report.selection.aic().is_finite());
        assert!(!report.tags.is_empty());
        assert!(report.volatility.long_run > 0.0);
        assert!(report.volatility.current > 0.0);
        // Annualized daily-percent vol of this DGP sits well inside (0, 1).
        assert!(report.volatility.long_run < 1.0);
        assert_eq!(report.variance_path.len(), 900);
        // Path was de-scaled out of percent² units.
        let last_scaled = report.selection.best.as_ref().unwrap().model().unwrap()
            .conditional_variance
            .last()
            .copied()
            .unwrap();
        let last = report.variance_path.last().copied().unwrap();
        assert!((last - last_scaled / 10_000.0).abs() < 1e-15);
    }

    #[test]
    fn summary_row_mirrors_report() {
        let cfg = EngineConfig::default();
        let input = garch_input("SUM", AssetClass::Futures, 5);
        let report = analyze_prices(&input, &cfg).unwrap();
        let s = report.summary();
        assert_eq!(s.asset, "SUM");
        assert_eq!(s.asset_class, "FUTURES");
        assert_eq!(s.model, report.selection.display_name());
        assert_eq!(s.n_obs, 900);
        assert_eq!(s.tags.len(), report.tags.len());
        // Symmetric GARCH selections report zero adjusted gamma.
        if s.model.starts_with("GARCH") {
            assert_eq!(s.gamma, 0.0);
        }
    }

    #[test]
    fn short_series_fails_per_asset() {
        let cfg = EngineConfig::default();
        let input = AssetInput {
            asset: "SHORT".into(),
            class: AssetClass::Equity,
            prices: prices_from_returns(&[0.1; 50]),
        };
        assert!(matches!(
            analyze_prices(&input, &cfg),
            Err(EngineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn constant_prices_yield_no_usable_model() {
        let mut cfg = EngineConfig::default();
        cfg.min_sample = 100;
        let input = AssetInput {
            asset: "FLAT".into(),
            class: AssetClass::Index,
            prices: prices_from_returns(&[0.0; 300]),
        };
        assert!(matches!(
            analyze_prices(&input, &cfg),
            Err(EngineError::NoUsableModel { candidates: 6 })
        ));
    }

    #[test]
    fn batch_isolates_failures() {
        let mut cfg = EngineConfig::default();
        cfg.min_sample = 100;
        let inputs = vec![
            garch_input("OK1", AssetClass::Equity, 13),
            AssetInput {
                asset: "BAD".into(),
                class: AssetClass::Fx,
                prices: prices_from_returns(&[0.0; 10]),
            },
            garch_input("OK2", AssetClass::Fx, 17),
        ];
        let out = run_batch(&inputs, &cfg);
        assert_eq!(out.reports.len(), 2);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].0, "BAD");
        let names: Vec<&str> = out.reports.iter().map(|r| r.asset.as_str()).collect();
        assert_eq!(names, vec!["OK1", "OK2"]);
        assert_eq!(out.summaries().len(), 2);
    }
}
