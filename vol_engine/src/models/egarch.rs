/// models/egarch.rs — Exponential GARCH(p,o,q) conditional variance
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// EGARCH: Nelson (1991). The recursion is on LOG variance, so no positivity
/// constraints are needed on ω, α or γ:
///
///   z_t = ε_t / σ_t
///
///   ln σ²_t = ω + Σ_{i=1..q} α_i · (|z_{t−i}| − E|z|)
///               + Σ_{k=1..o} γ_k · z_{t−k}
///               + Σ_{j=1..p} β_j · ln σ²_{t−j}
///
///   E|z| = √(2/π) for standard normal innovations.
///
///   γ < 0 → negative shocks raise volatility more than positive ones
///   (leverage effect). Stationarity requires |Σβ| < 1.
/// ─────────────────────────────────────────────────────────────────────────

/// Clamp on ln σ² to keep exp() finite while the optimizer explores.
const LOG_VAR_BOUND: f64 = 50.0;

/// Run the EGARCH(p,o,q) recursion. `z_t` depends on the σ_t computed in the
/// same pass, so the path is built strictly forward; pre-sample ln σ² terms
/// are backfilled with ln(init_var) and pre-sample z with 0.
pub fn variance_path(
    omega: f64,
    alpha: &[f64],
    gamma: &[f64],
    beta: &[f64],
    eps: &[f64],
    init_var: f64,
) -> Vec<f64> {
    let n = eps.len();
    let ln_init = init_var.max(1e-12).ln();
    let e_abs_z = (2.0 / std::f64::consts::PI).sqrt();

    let mut ln_s2 = vec![ln_init; n];
    let mut z: Vec<f64> = vec![0.0; n];

    for t in 0..n {
        let mut lv = omega;
        for (i, a) in alpha.iter().enumerate() {
            let z_lag = if t > i { z[t - 1 - i] } else { 0.0 };
            lv += a * (z_lag.abs() - e_abs_z);
        }
        for (k, g) in gamma.iter().enumerate() {
            let z_lag = if t > k { z[t - 1 - k] } else { 0.0 };
            lv += g * z_lag;
        }
        for (j, b) in beta.iter().enumerate() {
            let prev = if t > j { ln_s2[t - 1 - j] } else { ln_init };
            lv += b * prev;
        }
        let lv = lv.clamp(-LOG_VAR_BOUND, LOG_VAR_BOUND);
        ln_s2[t] = lv;
        z[t] = eps[t] / (0.5 * lv).exp();
    }

    ln_s2.into_iter().map(f64::exp).collect()
}

/// Distance from the feasible region; only the β sum is constrained.
pub fn constraint_violation(beta: &[f64]) -> f64 {
    let beta_sum: f64 = beta.iter().sum();
    if beta_sum.abs() >= 0.9999 {
        beta_sum.abs() - 0.9999
    } else {
        0.0
    }
}

/// Starting point with steady-state ln σ² matched to the sample variance:
/// ω = (1 − Σβ)·ln(init_var) with Σβ = 0.95.
pub fn initial_params(p: usize, o: usize, q: usize, init_var: f64) -> Vec<f64> {
    let ln_var = init_var.max(1e-12).ln();
    let mut x = Vec::with_capacity(1 + q + o + p);
    x.push(0.05 * ln_var);
    x.extend(std::iter::repeat(0.10 / q as f64).take(q));
    x.extend(std::iter::repeat(-0.05 / o.max(1) as f64).take(o));
    x.extend(std::iter::repeat(0.95 / p as f64).take(p));
    x
}
