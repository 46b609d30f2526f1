/// models.rs — Conditional-variance model catalogue
///
/// Shared types for the three supported families plus the fixed six-entry
/// candidate catalogue. The catalogue order is load-bearing: AIC ties are
/// broken by first-encountered position.
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

pub mod egarch;
pub mod garch;
pub mod gjr;

/// Model family: symmetric GARCH, exponential (log-variance) EGARCH, or
/// threshold-asymmetric GJR-GARCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolFamily {
    Garch,
    Egarch,
    GjrGarch,
}

/// Residual distribution assumption for the likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dist {
    Normal,
    /// Student-t with degrees of freedom ν estimated alongside the
    /// variance parameters.
    StudentT,
}

/// One candidate specification.
///
///   p — lagged-variance order (β terms), ≥ 1
///   o — asymmetry order (γ terms), 0 or 1
///   q — lagged-shock order (α terms), ≥ 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub family: VolFamily,
    pub p: usize,
    pub o: usize,
    pub q: usize,
    pub display_name: &'static str,
}

impl ModelSpec {
    /// Number of variance parameters the optimizer estimates
    /// (ω + α's + γ's + β's), excluding mean and ν.
    pub fn n_variance_params(&self) -> usize {
        1 + self.q + self.o + self.p
    }
}

/// The fixed candidate set, in selection order.
pub const CATALOGUE: [ModelSpec; 6] = [
    ModelSpec { family: VolFamily::Garch, p: 1, o: 0, q: 1, display_name: "GARCH(1,1)" },
    ModelSpec { family: VolFamily::Garch, p: 1, o: 0, q: 2, display_name: "GARCH(1,2)" },
    ModelSpec { family: VolFamily::Garch, p: 2, o: 0, q: 1, display_name: "GARCH(2,1)" },
    ModelSpec { family: VolFamily::Egarch, p: 1, o: 1, q: 1, display_name: "EGARCH(1,1)" },
    ModelSpec { family: VolFamily::Egarch, p: 1, o: 1, q: 2, display_name: "EGARCH(1,2)" },
    ModelSpec { family: VolFamily::GjrGarch, p: 1, o: 1, q: 1, display_name: "GJR-GARCH(1,1,1)" },
];

/// Structured coefficient key. Replaces lookups by concatenated strings
/// ("alpha[1]", …) with a typed (role, order) pair; the string form is
/// reconstructed only at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoefKey {
    Mu,
    Omega,
    Alpha(usize),
    Gamma(usize),
    Beta(usize),
    /// Student-t degrees of freedom (only when Dist::StudentT).
    Nu,
}

impl std::fmt::Display for CoefKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoefKey::Mu => write!(f, "mu"),
            CoefKey::Omega => write!(f, "omega"),
            CoefKey::Alpha(i) => write!(f, "alpha[{i}]"),
            CoefKey::Gamma(i) => write!(f, "gamma[{i}]"),
            CoefKey::Beta(i) => write!(f, "beta[{i}]"),
            CoefKey::Nu => write!(f, "nu"),
        }
    }
}

/// Sparse coefficient map produced by a converged fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coefficients(AHashMap<CoefKey, f64>);

impl Coefficients {
    pub fn new() -> Self {
        Self(AHashMap::new())
    }

    pub fn insert(&mut self, key: CoefKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: CoefKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Deterministically ordered (key, value) pairs for export.
    pub fn sorted(&self) -> Vec<(CoefKey, f64)> {
        let mut out: Vec<_> = self.0.iter().map(|(k, v)| (*k, *v)).collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }

    /// Export form: reconstructed names and values.
    pub fn named(&self) -> Vec<(String, f64)> {
        self.sorted()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_order_is_fixed() {
        assert_eq!(CATALOGUE.len(), 6);
        assert_eq!(CATALOGUE[0].display_name, "GARCH(1,1)");
        assert_eq!(CATALOGUE[3].family, VolFamily::Egarch);
        assert_eq!(CATALOGUE[5].display_name, "GJR-GARCH(1,1,1)");
        // Asymmetry order is zero exactly for the symmetric family
        for spec in &CATALOGUE {
            assert_eq!(spec.o == 0, spec.family == VolFamily::Garch);
            assert!(spec.p >= 1 && spec.q >= 1);
        }
    }

    #[test]
    fn coef_key_display_matches_export_names() {
        assert_eq!(CoefKey::Omega.to_string(), "omega");
        assert_eq!(CoefKey::Alpha(1).to_string(), "alpha[1]");
        assert_eq!(CoefKey::Gamma(1).to_string(), "gamma[1]");
    }

    #[test]
    fn sorted_is_deterministic() {
        let mut c = Coefficients::new();
        c.insert(CoefKey::Beta(1), 0.9);
        c.insert(CoefKey::Omega, 0.1);
        c.insert(CoefKey::Alpha(1), 0.05);
        let order: Vec<String> = c.named().into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["omega", "alpha[1]", "beta[1]"]);
    }
}
