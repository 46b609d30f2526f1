/// diagnostics.rs — Residual whiteness validation (Ljung-Box)
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// Ljung-Box portmanteau statistic on a series x_1..x_n at h lags:
///
///   ρ̂_k = Σ_{t=k+1..n} (x_t − x̄)(x_{t−k} − x̄) / Σ_t (x_t − x̄)²
///
///   Q = n(n+2) · Σ_{k=1..h} ρ̂²_k / (n − k)
///
///   Under H₀ (no autocorrelation up to lag h): Q ~ χ²(h)
///   p-value = 1 − F_χ²(h)(Q)
///
/// High p-value → residuals look like white noise → adequate fit.
/// Applied to SQUARED standardized residuals to detect remaining ARCH
/// structure after a fit.
/// ─────────────────────────────────────────────────────────────────────────
use statrs::distribution::{ChiSquared, ContinuousCDF};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticError {
    #[error("series too short for a whiteness test ({0} observations)")]
    TooShort(usize),

    #[error("zero-variance series, autocorrelations undefined")]
    ZeroVariance,

    #[error("non-finite test statistic")]
    Numerical,
}

/// Ljung-Box test outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjungBox {
    pub statistic: f64,
    pub p_value: f64,
    /// Lag count actually used (may be reduced on short samples).
    pub lags: usize,
}

/// Run the Ljung-Box test at `requested_lags`.
///
/// When the series is shorter than twice the requested lag count, the lag
/// count drops to len/4 (minimum 1) so the test stays well-posed.
pub fn ljung_box(series: &[f64], requested_lags: usize) -> Result<LjungBox, DiagnosticError> {
    let n = series.len();
    if n < 4 {
        return Err(DiagnosticError::TooShort(n));
    }

    let lags = if n < requested_lags * 2 {
        (n / 4).max(1)
    } else {
        requested_lags.max(1)
    };

    let nf = n as f64;
    let mean = series.iter().sum::<f64>() / nf;
    let denom: f64 = series.iter().map(|x| (x - mean).powi(2)).sum();
    if denom < 1e-300 {
        return Err(DiagnosticError::ZeroVariance);
    }

    let mut q = 0.0;
    for k in 1..=lags {
        let num: f64 = series[k..]
            .iter()
            .zip(series.iter())
            .map(|(xt, xlag)| (xt - mean) * (xlag - mean))
            .sum();
        let rho = num / denom;
        q += rho * rho / (nf - k as f64);
    }
    q *= nf * (nf + 2.0);

    if !q.is_finite() {
        return Err(DiagnosticError::Numerical);
    }

    let chi2 = ChiSquared::new(lags as f64).map_err(|_| DiagnosticError::Numerical)?;
    let p_value = 1.0 - chi2.cdf(q);

    Ok(LjungBox {
        statistic: q,
        p_value,
        lags,
    })
}

/// Fail-closed wrapper used by the Model Fitter: any diagnostic failure is
/// reported as p = 0.0 ("fails whiteness"), never an error. A degenerate
/// residual series should disqualify a fit, not crash the candidate loop.
pub fn whiteness_pvalue(series: &[f64], requested_lags: usize) -> f64 {
    match ljung_box(series, requested_lags) {
        Ok(lb) => lb.p_value,
        Err(e) => {
            debug!("whiteness test fail-closed to p=0.0: {e}");
            0.0
        }
    }
}
