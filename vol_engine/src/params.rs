/// params.rs — Canonical scalar summaries of a fitted coefficient map
///
/// Sparse coefficient maps (different families expose different keys, and
/// failed fits expose none) are collapsed into four canonical scalars:
///
///   omega       — long-run intercept (0 if absent)
///   alpha_total — Σ α_i over present lag orders 1..9 (shock reaction)
///   beta_total  — Σ β_j over present lag orders 1..9 (persistence)
///   gamma       — order-1 asymmetry coefficient (0 if absent)
///
/// Pure and total: absent keys contribute zero, never an error.
use serde::Serialize;

use crate::models::{CoefKey, Coefficients, VolFamily};

/// Highest lag order scanned when summing sparse coefficients.
pub const MAX_LAG_ORDER: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NormalizedParameters {
    pub omega: f64,
    pub alpha_total: f64,
    pub beta_total: f64,
    pub gamma: f64,
}

/// Collapse a (possibly empty) coefficient map into canonical scalars.
pub fn normalize(coeffs: &Coefficients) -> NormalizedParameters {
    let sum_orders = |key: fn(usize) -> CoefKey| -> f64 {
        (1..=MAX_LAG_ORDER)
            .filter_map(|i| coeffs.get(key(i)))
            .sum()
    };

    NormalizedParameters {
        omega: coeffs.get(CoefKey::Omega).unwrap_or(0.0),
        alpha_total: sum_orders(CoefKey::Alpha),
        beta_total: sum_orders(CoefKey::Beta),
        gamma: coeffs.get(CoefKey::Gamma(1)).unwrap_or(0.0),
    }
}

impl NormalizedParameters {
    /// Asymmetry contribution as it enters the long-run variance and the
    /// reported gamma: full γ for EGARCH, γ/2 for GJR (threshold asymmetry
    /// loads on negative shocks only, expectation 1/2), zero for symmetric
    /// GARCH.
    pub fn gamma_adjusted(&self, family: VolFamily) -> f64 {
        match family {
            VolFamily::Garch => 0.0,
            VolFamily::Egarch => self.gamma,
            VolFamily::GjrGarch => self.gamma / 2.0,
        }
    }

    /// Persistence of a variance shock: α + β + family-adjusted γ.
    pub fn persistence(&self, family: VolFamily) -> f64 {
        self.alpha_total + self.beta_total + self.gamma_adjusted(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_coeffs() -> Coefficients {
        let mut c = Coefficients::new();
        c.insert(CoefKey::Omega, 0.02);
        c.insert(CoefKey::Alpha(1), 0.08);
        c.insert(CoefKey::Alpha(2), 0.04);
        c.insert(CoefKey::Beta(1), 0.85);
        c.insert(CoefKey::Gamma(1), -0.10);
        c
    }

    #[test]
    fn totals_sum_present_orders_only() {
        let p = normalize(&base_coeffs());
        assert!((p.omega - 0.02).abs() < 1e-15);
        assert!((p.alpha_total - 0.12).abs() < 1e-15);
        assert!((p.beta_total - 0.85).abs() < 1e-15);
        assert!((p.gamma + 0.10).abs() < 1e-15);
    }

    #[test]
    fn empty_map_normalizes_to_zero() {
        assert_eq!(normalize(&Coefficients::new()), NormalizedParameters::default());
    }

    #[test]
    fn absent_order_with_zero_value_changes_nothing() {
        let before = normalize(&base_coeffs());
        let mut c = base_coeffs();
        c.insert(CoefKey::Alpha(7), 0.0);
        c.insert(CoefKey::Beta(3), 0.0);
        assert_eq!(normalize(&c), before);
    }

    #[test]
    fn present_key_adds_exactly_its_value() {
        let before = normalize(&base_coeffs());
        let mut c = base_coeffs();
        c.insert(CoefKey::Beta(2), 0.05);
        let after = normalize(&c);
        assert!((after.beta_total - before.beta_total - 0.05).abs() < 1e-15);
        assert_eq!(after.alpha_total, before.alpha_total);
    }

    #[test]
    fn gamma_adjustment_per_family() {
        let p = NormalizedParameters {
            omega: 0.0,
            alpha_total: 0.1,
            beta_total: 0.8,
            gamma: 0.06,
        };
        assert_eq!(p.gamma_adjusted(VolFamily::Garch), 0.0);
        assert_eq!(p.gamma_adjusted(VolFamily::Egarch), 0.06);
        assert_eq!(p.gamma_adjusted(VolFamily::GjrGarch), 0.03);
        assert!((p.persistence(VolFamily::GjrGarch) - 0.93).abs() < 1e-15);
    }
}
