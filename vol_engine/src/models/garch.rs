/// models/garch.rs — Symmetric GARCH(p,q) conditional variance
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
/// GARCH(p,q): Bollerslev (1986)
///
///   Return innovation:  ε_t = r_t − μ
///   Conditional variance update:
///
///       σ²_t = ω + Σ_{i=1..q} α_i · ε²_{t−i} + Σ_{j=1..p} β_j · σ²_{t−j}
///
///   Constraints (covariance stationarity):
///     ω > 0,  α_i ≥ 0,  β_j ≥ 0,  Σα + Σβ < 1
///
///   Long-run (unconditional) variance:
///       σ²_∞ = ω / (1 − Σα − Σβ)
/// ─────────────────────────────────────────────────────────────────────────

/// Variance floor inside the recursion (keeps the log-likelihood defined).
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// Run the GARCH(p,q) recursion over demeaned returns.
///
/// Pre-sample ε² and σ² terms are backfilled with `init_var`
/// (the sample variance), the standard presample convention.
pub fn variance_path(
    omega: f64,
    alpha: &[f64],
    beta: &[f64],
    eps: &[f64],
    init_var: f64,
) -> Vec<f64> {
    let n = eps.len();
    let mut sigma2 = vec![init_var; n];

    for t in 1..n {
        let mut var = omega;
        for (i, a) in alpha.iter().enumerate() {
            let shock = if t > i { eps[t - 1 - i].powi(2) } else { init_var };
            var += a * shock;
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
pub fn constraint_violation(omega: f64, alpha: &[f64], beta: &[f64]) -> f64 {
    let mut v = 0.0;
    if omega <= 0.0 {
        v += 1.0 - omega;
    }
    for &a in alpha {
        if a < 0.0 {
            v += -a;
        }
    }
    for &b in beta {
        if b < 0.0 {
            v += -b;
        }
    }
    let persistence: f64 = alpha.iter().sum::<f64>() + beta.iter().sum::<f64>();
    if persistence >= 0.9999 {
        v += persistence - 0.9999;
    }
    v
}

/// Standard starting point: persistence 0.95 split across lags,
/// ω matched to the sample variance.
pub fn initial_params(p: usize, q: usize, init_var: f64) -> Vec<f64> {
    let mut x = Vec::with_capacity(1 + q + p);
    x.push(init_var * 0.05);
    x.extend(std::iter::repeat(0.05 / q as f64).take(q));
    x.extend(std::iter::repeat(0.90 / p as f64).take(p));
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursion_matches_hand_rolled_garch11() {
        let eps = [0.5, -1.0, 2.0, 0.1];
        let (omega, alpha, beta) = (0.1, 0.1, 0.8);
        let init_var = 1.0;
        let s2 = variance_path(omega, &[alpha], &[beta], &eps, init_var);

        let mut expect = vec![init_var];
        for t in 1..eps.len() {
            expect.push(omega + alpha * eps[t - 1].powi(2) + beta * expect[t - 1]);
        }
        for (a, b) in s2.iter().zip(expect.iter()) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn spike_elevates_variance() {
        let mut eps = vec![0.1; 50];
        eps[25] = 5.0;
        let s2 = variance_path(1e-3, &[0.1], &[0.85], &eps, 0.01);
        assert!(s2[26] > s2[25]);
        // decays back toward long-run afterwards
        assert!(s2[40] < s2[26]);
    }

    #[test]
    fn stationarity_constraint() {
        assert_eq!(constraint_violation(0.1, &[0.1], &[0.8]), 0.0);
        assert!(constraint_violation(0.1, &[0.3], &[0.8]) > 0.0);
        assert!(constraint_violation(-0.1, &[0.1], &[0.8]) > 0.0);
        assert!(constraint_violation(0.1, &[-0.1], &[0.8]) > 0.0);
    }
}
