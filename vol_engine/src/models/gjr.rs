/// models/gjr.rs — GJR-GARCH(p,o,q) conditional variance
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// GJR: Glosten, Jagannathan & Runkle (1993). Threshold asymmetry — the
/// γ term loads only on NEGATIVE past shocks:
///
///   σ²_t = ω + Σ_{i=1..q} (α_i + γ_i · 1[ε_{t−i} < 0]) · ε²_{t−i}
///            + Σ_{j=1..p} β_j · σ²_{t−j}
///
///   (γ_i present for i ≤ o only.)
///
///   Constraints: ω > 0, α_i ≥ 0, β_j ≥ 0, α_i + γ_i ≥ 0,
///   and E[1[ε<0]] = 1/2 under symmetric innovations gives persistence
///   Σα + Σγ/2 + Σβ < 1.
/// ─────────────────────────────────────────────────────────────────────────
use super::garch::VARIANCE_FLOOR;

/// Run the GJR(p,o,q) recursion over demeaned returns. Pre-sample shocks are
/// backfilled with `init_var` and treated as sign-neutral (γ weighted by 1/2,
/// its unconditional expectation).
pub fn variance_path(
    omega: f64,
    alpha: &[f64],
    gamma: &[f64],
    beta: &[f64],
    eps: &[f64],
    init_var: f64,
) -> Vec<f64> {
    let n = eps.len();
    let mut sigma2 = vec![init_var; n];

    for t in 1..n {
        let mut var = omega;
        for (i, a) in alpha.iter().enumerate() {
            let g = gamma.get(i).copied().unwrap_or(0.0);
            if t > i {
                let e = eps[t - 1 - i];
                let loading = if e < 0.0 { a + g } else { *a };
                var += loading * e.powi(2);
            } else {
                var += (a + 0.5 * g) * init_var;
            }
        }
        for (j, b) in beta.iter().enumerate() {
            let prev = if t > j { sigma2[t - 1 - j] } else { init_var };
            var += b * prev;
        }
        sigma2[t] = var.max(VARIANCE_FLOOR);
    }

    sigma2
}

/// Distance from the feasible region; 0.0 when all constraints hold.
pub fn constraint_violation(omega: f64, alpha: &[f64], gamma: &[f64], beta: &[f64]) -> f64 {
    let mut v = 0.0;
    if omega <= 0.0 {
        v += 1.0 - omega;
    }
    for (i, &a) in alpha.iter().enumerate() {
        if a < 0.0 {
            v += -a;
        }
        let g = gamma.get(i).copied().unwrap_or(0.0);
        if a + g < 0.0 {
            v += -(a + g);
        }
    }
    for &b in beta {
        if b < 0.0 {
            v += -b;
        }
    }
    let persistence: f64 = alpha.iter().sum::<f64>()
        + 0.5 * gamma.iter().sum::<f64>()
        + beta.iter().sum::<f64>();
    if persistence >= 0.9999 {
        v += persistence - 0.9999;
    }
    v
}

/// Standard starting point: small symmetric load, asymmetry carried by γ.
pub fn initial_params(p: usize, o: usize, q: usize, init_var: f64) -> Vec<f64> {
    let mut x = Vec::with_capacity(1 + q + o + p);
    x.push(init_var * 0.05);
    x.extend(std::iter::repeat(0.03 / q as f64).take(q));
    x.extend(std::iter::repeat(0.05 / o.max(1) as f64).take(o));
    x.extend(std::iter::repeat(0.88 / p as f64).take(p));
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_shock_loads_gamma() {
        let eps_neg = [0.0, -1.0, 0.0];
        let eps_pos = [0.0, 1.0, 0.0];
        let s2_neg = variance_path(0.01, &[0.05], &[0.10], &[0.85], &eps_neg, 1.0);
        let s2_pos = variance_path(0.01, &[0.05], &[0.10], &[0.85], &eps_pos, 1.0);
        // (α + γ)·ε² vs α·ε²
        assert!(s2_neg[2] > s2_pos[2]);
        assert!((s2_neg[2] - s2_pos[2] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn reduces_to_garch_when_gamma_zero() {
        let eps = [0.3, -0.7, 1.2, -0.1, 0.4];
        let with = variance_path(0.02, &[0.08], &[0.0], &[0.85], &eps, 0.5);
        let without = super::super::garch::variance_path(0.02, &[0.08], &[0.85], &eps, 0.5);
        for (a, b) in with.iter().zip(without.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn half_gamma_enters_persistence() {
        // Σα + Σγ/2 + Σβ = 0.05 + 0.05 + 0.90 = 1.0 → violation
        assert!(constraint_violation(0.01, &[0.05], &[0.10], &[0.90]) > 0.0);
        assert_eq!(constraint_violation(0.01, &[0.05], &[0.10], &[0.85]), 0.0);
    }
}
