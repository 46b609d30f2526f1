/// volatility.rs — Long-run and current annualized volatility
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
///   Long-run (unconditional) variance:
///
///       σ²_∞ = ω / (1 − α_total − β_total − γ_adj)
///
///   γ_adj per family: γ (EGARCH), γ/2 (GJR), 0 (GARCH).
///
///   Clamp: when 1 − persistence ≤ floor (non-stationary or unit-root fit)
///   the denominator is floored at a small positive constant instead of
///   emitting Inf/NaN. This silently masks non-stationarity; the clamp is
///   logged so such fits remain visible in diagnostics.
///
///   Annualisation and de-scaling (returns were fitted at `scale`× their
///   real magnitude, so variances carry scale²):
///
///       σ_annual = √(σ² · periods_per_year) / scale
///
///   Current volatility uses the most recent fitted conditional variance.
/// ─────────────────────────────────────────────────────────────────────────
use serde::Serialize;
use tracing::warn;

use crate::config::EngineConfig;
use crate::params::NormalizedParameters;
use crate::models::VolFamily;

/// Annualized fractional volatility, real-world return units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityEstimate {
    pub long_run: f64,
    pub current: f64,
}

/// Derive both volatility estimates from normalized parameters and the
/// fitted conditional-variance path (scaled units).
///
/// Total: always returns finite, non-negative values. Negative long-run
/// variance (possible for EGARCH, whose ω lives on the log scale) clamps
/// to zero.
pub fn estimate(
    params: &NormalizedParameters,
    family: VolFamily,
    conditional_variance: &[f64],
    scale: f64,
    cfg: &EngineConfig,
) -> VolatilityEstimate {
    let denom = 1.0 - params.persistence(family);
    let denom = if denom <= cfg.persistence_floor {
        warn!(
            persistence = params.persistence(family),
            floor = cfg.persistence_floor,
            "non-stationary fit, flooring long-run variance denominator"
        );
        cfg.persistence_floor
    } else {
        denom
    };

    let long_run_var = (params.omega / denom).max(0.0);
    let current_var = conditional_variance
        .last()
        .copied()
        .unwrap_or(0.0)
        .max(0.0);

    VolatilityEstimate {
        long_run: annualize(long_run_var, scale, cfg.periods_per_year),
        current: annualize(current_var, scale, cfg.periods_per_year),
    }
}

fn annualize(variance: f64, scale: f64, periods_per_year: f64) -> f64 {
    (variance * periods_per_year).sqrt() / scale
}
