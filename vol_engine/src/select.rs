/// select.rs — Candidate sweep and three-tier model selection
///
/// Selection policy, in order of preference:
///
///   1. statistically adequate fits (success AND whiteness p > threshold):
///      pick minimum AIC;
///   2. any successful fit: pick minimum AIC;
///   3. nothing converged: sentinel result, callers treat as "no usable
///      model" and drop the asset from downstream aggregation.
///
/// Adequacy beats raw fit quality, but a fit always beats no fit. AIC ties
/// break toward the earlier catalogue position (strict `<` comparison over
/// a stable iteration order).
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::fit::{fit_spec, FitResult};
use crate::models::ModelSpec;
use crate::returns::ReturnSeries;

/// The chosen fit plus the full candidate list for audit/export.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// `None` when every candidate failed (the sentinel state).
    pub best: Option<FitResult>,
    pub candidates: Vec<FitResult>,
}

impl SelectionResult {
    /// Display name reported for the sentinel state.
    pub const SENTINEL_NAME: &'static str = "FAILED";
    /// Large-but-finite criterion reported for the sentinel state.
    pub const SENTINEL_AIC: f64 = 999.0;

    pub fn is_usable(&self) -> bool {
        self.best.is_some()
    }

    pub fn display_name(&self) -> &str {
        self.best
            .as_ref()
            .map_or(Self::SENTINEL_NAME, |b| b.spec.display_name)
    }

    pub fn aic(&self) -> f64 {
        self.best.as_ref().map_or(Self::SENTINEL_AIC, |b| b.aic())
    }

    pub fn lb_pvalue(&self) -> f64 {
        self.best.as_ref().map_or(0.0, |b| b.lb_pvalue())
    }
}

/// Fit every candidate in catalogue order and select.
///
/// Each fit constructs its own estimation context; candidates are never
/// interleaved within one asset.
pub fn select_model(
    returns: &ReturnSeries,
    catalogue: &[ModelSpec],
    cfg: &EngineConfig,
) -> SelectionResult {
    let candidates: Vec<FitResult> = catalogue
        .iter()
        .map(|spec| fit_spec(returns, spec, cfg))
        .collect();
    let result = select_from(candidates, cfg.whiteness_threshold);
    match &result.best {
        Some(b) => info!(
            model = b.spec.display_name,
            aic = b.aic(),
            lb_p = b.lb_pvalue(),
            "model selected"
        ),
        None => warn!("all candidates failed, no usable model"),
    }
    result
}

/// Pure selection over already-computed fit results.
pub fn select_from(candidates: Vec<FitResult>, whiteness_threshold: f64) -> SelectionResult {
    let best = min_aic_index(&candidates, |r| {
        r.success() && r.lb_pvalue() > whiteness_threshold
    })
    .or_else(|| min_aic_index(&candidates, |r| r.success()))
    .map(|i| candidates[i].clone());

    SelectionResult { best, candidates }
}

/// Index of the minimum-AIC result among those passing `keep`, first
/// occurrence winning ties. `None` when nothing passes.
fn min_aic_index<F>(candidates: &[FitResult], keep: F) -> Option<usize>
where
    F: Fn(&FitResult) -> bool,
{
    let mut best: Option<usize> = None;
    for (i, r) in candidates.iter().enumerate() {
        if !keep(r) {
            continue;
        }
        match best {
            Some(b) if candidates[b].aic() <= r.aic() => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitFailure;
    use crate::fit::FittedModel;
    use crate::models::{Coefficients, CATALOGUE};

    fn ok_result(idx: usize, aic: f64, lb_pvalue: f64) -> FitResult {
        FitResult {
            spec: CATALOGUE[idx],
            outcome: Ok(FittedModel {
                coefficients: Coefficients::new(),
                log_likelihood: 0.0,
                aic,
                lb_pvalue,
                conditional_variance: vec![1.0; 10],
            }),
        }
    }

    fn failed_result(idx: usize) -> FitResult {
        FitResult {
            spec: CATALOGUE[idx],
            outcome: Err(FitFailure::DegenerateLikelihood),
        }
    }

    #[test]
    fn adequate_fit_wins_regardless_of_aic() {
        // The only whiteness-passing candidate has a terrible AIC; it must
        // still win over nothing (all others failed).
        let candidates = vec![
            failed_result(0),
            ok_result(1, 5000.0, 0.5),
            failed_result(2),
            failed_result(3),
            failed_result(4),
            failed_result(5),
        ];
        let sel = select_from(candidates, 0.05);
        assert_eq!(sel.display_name(), "GARCH(1,2)");
        assert_eq!(sel.aic(), 5000.0);
    }

    #[test]
    fn whiteness_beats_lower_aic() {
        let candidates = vec![
            ok_result(0, -100.0, 0.01), // better AIC, fails whiteness
            ok_result(1, -50.0, 0.30),  // adequate
        ];
        let sel = select_from(candidates, 0.05);
        assert_eq!(sel.display_name(), "GARCH(1,2)");
    }

    #[test]
    fn tier_two_uses_aic_not_pvalue() {
        // Both succeed, both fail whiteness → lower AIC wins, not the
        // higher p-value.
        let candidates = vec![
            ok_result(0, -200.0, 0.01),
            ok_result(1, -100.0, 0.04),
        ];
        let sel = select_from(candidates, 0.05);
        assert_eq!(sel.display_name(), "GARCH(1,1)");
        assert_eq!(sel.aic(), -200.0);
    }

    #[test]
    fn all_failed_yields_sentinel() {
        let candidates = (0..6).map(failed_result).collect();
        let sel = select_from(candidates, 0.05);
        assert!(!sel.is_usable());
        assert_eq!(sel.display_name(), SelectionResult::SENTINEL_NAME);
        assert_eq!(sel.aic(), SelectionResult::SENTINEL_AIC);
        assert!(sel.aic().is_finite());
        assert_eq!(sel.candidates.len(), 6);
    }

    #[test]
    fn aic_ties_break_by_catalogue_order() {
        let candidates = vec![
            ok_result(0, -100.0, 0.30),
            ok_result(1, -100.0, 0.90),
        ];
        let sel = select_from(candidates, 0.05);
        assert_eq!(sel.display_name(), "GARCH(1,1)");
    }

    #[test]
    fn candidate_list_is_preserved_for_audit() {
        let candidates = vec![ok_result(0, -10.0, 0.5), failed_result(1)];
        let sel = select_from(candidates, 0.05);
        assert_eq!(sel.candidates.len(), 2);
        assert!(sel.candidates[0].success());
        assert!(!sel.candidates[1].success());
    }
}
