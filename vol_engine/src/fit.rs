/// fit.rs — Single-candidate maximum-likelihood fitting
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// Gaussian log-likelihood of demeaned returns ε given a conditional
/// variance path σ²_t:
///
///   L = −½ Σ_t [ ln(2π) + ln σ²_t + ε²_t / σ²_t ]
///
/// Student-t (ν > 2, variance-standardized):
///
///   L = Σ_t [ ln Γ((ν+1)/2) − ln Γ(ν/2) − ½ ln((ν−2)π) − ½ ln σ²_t
///             − (ν+1)/2 · ln(1 + ε²_t / (σ²_t (ν−2))) ]
///
/// Parameter vector layout (optimizer space):
///
///   [ ω, α_1..α_q, γ_1..γ_o, β_1..β_p (, ν) ]
///
/// Constraint handling: infeasible points return a large finite penalty
/// proportional to the violation, keeping the simplex inside the feasible
/// region without transforms.
///
///   AIC = 2k − 2L,  k = #optimized params + 1 (mean)
///
/// Every failure mode (short sample, flat likelihood, non-convergence) is
/// absorbed into the FitResult; the candidate loop never sees an Err.
/// ─────────────────────────────────────────────────────────────────────────
use statrs::function::gamma::ln_gamma;
use tracing::debug;

use crate::config::EngineConfig;
use crate::diagnostics::whiteness_pvalue;
use crate::error::FitFailure;
use crate::models::{egarch, garch, gjr, CoefKey, Coefficients, Dist, ModelSpec, VolFamily};
use crate::optim::NelderMead;
use crate::returns::ReturnSeries;

const LN_2PI: f64 = 1.837_877_066_409_345_5;
/// Objective value returned for infeasible parameter vectors.
const PENALTY_BASE: f64 = 1e12;
/// Below this sample variance the likelihood surface is flat.
const MIN_SAMPLE_VARIANCE: f64 = 1e-12;
/// Extra observations required beyond the parameter count.
const MIN_OBS_MARGIN: usize = 20;

/// A converged fit.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub coefficients: Coefficients,
    pub log_likelihood: f64,
    pub aic: f64,
    /// Ljung-Box p-value of the squared standardized residuals.
    pub lb_pvalue: f64,
    /// Fitted conditional variance path, in scaled return units.
    pub conditional_variance: Vec<f64>,
}

/// Outcome of fitting one candidate spec. `Err` carries the inspectable
/// failure reason; selection treats every failure uniformly.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub spec: ModelSpec,
    pub outcome: Result<FittedModel, FitFailure>,
}

impl FitResult {
    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Akaike criterion; +∞ sentinel on failure so a failed candidate can
    /// never win a minimum-AIC comparison.
    pub fn aic(&self) -> f64 {
        self.outcome
            .as_ref()
            .map_or(f64::INFINITY, |m| m.aic)
    }

    /// Whiteness p-value; 0.0 sentinel on failure.
    pub fn lb_pvalue(&self) -> f64 {
        self.outcome.as_ref().map_or(0.0, |m| m.lb_pvalue)
    }

    pub fn model(&self) -> Option<&FittedModel> {
        self.outcome.as_ref().ok()
    }

    /// Coefficient map; empty on failure (the normalizer is total over
    /// empty maps).
    pub fn coefficients(&self) -> Coefficients {
        self.outcome
            .as_ref()
            .map(|m| m.coefficients.clone())
            .unwrap_or_default()
    }
}

/// Fit one candidate spec to a return series.
///
/// Never propagates an error: the result carries either the fitted model or
/// the reason it was rejected.
pub fn fit_spec(returns: &ReturnSeries, spec: &ModelSpec, cfg: &EngineConfig) -> FitResult {
    let outcome = fit_inner(returns, spec, cfg);
    match &outcome {
        Ok(m) => debug!(
            model = spec.display_name,
            aic = m.aic,
            lb_p = m.lb_pvalue,
            "fit converged"
        ),
        Err(e) => debug!(model = spec.display_name, "fit failed: {e}"),
    }
    FitResult {
        spec: *spec,
        outcome,
    }
}

fn fit_inner(
    returns: &ReturnSeries,
    spec: &ModelSpec,
    cfg: &EngineConfig,
) -> Result<FittedModel, FitFailure> {
    let r = returns.values();
    let need = MIN_OBS_MARGIN + spec.n_variance_params();
    if r.len() < need {
        return Err(FitFailure::TooShort {
            have: r.len(),
            need,
        });
    }

    let n = r.len() as f64;
    let mu = r.iter().sum::<f64>() / n;
    let eps: Vec<f64> = r.iter().map(|x| x - mu).collect();
    let init_var = eps.iter().map(|e| e * e).sum::<f64>() / n;
    if !init_var.is_finite() || init_var < MIN_SAMPLE_VARIANCE {
        return Err(FitFailure::DegenerateSeries(MIN_SAMPLE_VARIANCE));
    }

    let mut x0 = match spec.family {
        VolFamily::Garch => garch::initial_params(spec.p, spec.q, init_var),
        VolFamily::Egarch => egarch::initial_params(spec.p, spec.o, spec.q, init_var),
        VolFamily::GjrGarch => gjr::initial_params(spec.p, spec.o, spec.q, init_var),
    };
    if cfg.distribution == Dist::StudentT {
        x0.push(8.0); // starting ν
    }

    let dist = cfg.distribution;
    let objective = |x: &[f64]| -> f64 {
        let violation = constraint_violation(spec, x, dist);
        if violation > 0.0 {
            return PENALTY_BASE * (1.0 + violation);
        }
        let s2 = variance_path(spec, x, &eps, init_var);
        let ll = log_likelihood(dist, x, &eps, &s2);
        if ll.is_finite() {
            -ll
        } else {
            PENALTY_BASE
        }
    };

    let opt = NelderMead::with_max_iter(cfg.max_iter).minimize(&objective, &x0);
    if !opt.converged {
        return Err(FitFailure::NotConverged {
            max_iter: cfg.max_iter,
        });
    }
    if !opt.fx.is_finite() || opt.fx >= PENALTY_BASE {
        return Err(FitFailure::DegenerateLikelihood);
    }

    let s2 = variance_path(spec, &opt.x, &eps, init_var);
    let log_likelihood = -opt.fx;
    let k = opt.x.len() as f64 + 1.0; // + mean
    let aic = 2.0 * k - 2.0 * log_likelihood;

    // Squared standardized residuals → whiteness of the remaining structure.
    let z2: Vec<f64> = eps
        .iter()
        .zip(s2.iter())
        .map(|(e, v)| e * e / v.max(MIN_SAMPLE_VARIANCE))
        .collect();
    let lb_pvalue = whiteness_pvalue(&z2, cfg.lb_lags);

    Ok(FittedModel {
        coefficients: build_coefficients(spec, &opt.x, mu, dist),
        log_likelihood,
        aic,
        lb_pvalue,
        conditional_variance: s2,
    })
}

/// Split the optimizer vector per the layout and run the family recursion.
fn variance_path(spec: &ModelSpec, x: &[f64], eps: &[f64], init_var: f64) -> Vec<f64> {
    let (omega, alpha, gamma, beta) = split_params(spec, x);
    match spec.family {
        VolFamily::Garch => garch::variance_path(omega, alpha, beta, eps, init_var),
        VolFamily::Egarch => egarch::variance_path(omega, alpha, gamma, beta, eps, init_var),
        VolFamily::GjrGarch => gjr::variance_path(omega, alpha, gamma, beta, eps, init_var),
    }
}

fn constraint_violation(spec: &ModelSpec, x: &[f64], dist: Dist) -> f64 {
    let (omega, alpha, gamma, beta) = split_params(spec, x);
    let mut v = match spec.family {
        VolFamily::Garch => garch::constraint_violation(omega, alpha, beta),
        VolFamily::Egarch => egarch::constraint_violation(beta),
        VolFamily::GjrGarch => gjr::constraint_violation(omega, alpha, gamma, beta),
    };
    if dist == Dist::StudentT {
        let nu = x[x.len() - 1];
        if nu <= 2.05 {
            v += 2.05 - nu + 1.0;
        } else if nu > 200.0 {
            v += nu - 200.0;
        }
    }
    v
}

/// [ω | α's | γ's | β's] view into the optimizer vector (ν excluded).
fn split_params<'a>(spec: &ModelSpec, x: &'a [f64]) -> (f64, &'a [f64], &'a [f64], &'a [f64]) {
    let omega = x[0];
    let alpha = &x[1..1 + spec.q];
    let gamma = &x[1 + spec.q..1 + spec.q + spec.o];
    let beta = &x[1 + spec.q + spec.o..1 + spec.q + spec.o + spec.p];
    (omega, alpha, gamma, beta)
}

fn log_likelihood(dist: Dist, x: &[f64], eps: &[f64], s2: &[f64]) -> f64 {
    match dist {
        Dist::Normal => eps
            .iter()
            .zip(s2.iter())
            .map(|(e, v)| -0.5 * (LN_2PI + v.ln() + e * e / v))
            .sum(),
        Dist::StudentT => {
            let nu = x[x.len() - 1];
            let c = ln_gamma((nu + 1.0) / 2.0)
                - ln_gamma(nu / 2.0)
                - 0.5 * ((nu - 2.0) * std::f64::consts::PI).ln();
            eps.iter()
                .zip(s2.iter())
                .map(|(e, v)| {
                    c - 0.5 * v.ln() - (nu + 1.0) / 2.0 * (1.0 + e * e / (v * (nu - 2.0))).ln()
                })
                .sum()
        }
    }
}

fn build_coefficients(spec: &ModelSpec, x: &[f64], mu: f64, dist: Dist) -> Coefficients {
    let (omega, alpha, gamma, beta) = split_params(spec, x);
    let mut coeffs = Coefficients::new();
    coeffs.insert(CoefKey::Mu, mu);
    coeffs.insert(CoefKey::Omega, omega);
    for (i, &a) in alpha.iter().enumerate() {
        coeffs.insert(CoefKey::Alpha(i + 1), a);
    }
    for (i, &g) in gamma.iter().enumerate() {
        coeffs.insert(CoefKey::Gamma(i + 1), g);
    }
    for (i, &b) in beta.iter().enumerate() {
        coeffs.insert(CoefKey::Beta(i + 1), b);
    }
    if dist == Dist::StudentT {
        coeffs.insert(CoefKey::Nu, x[x.len() - 1]);
    }
    coeffs
}
