/// error.rs — Engine error taxonomy
///
/// Two propagation regimes coexist:
///
///   * `EngineError` — per-asset fatal. Reported to the caller; the batch
///     runner records it and continues with the remaining assets.
///   * `FitFailure` — per-candidate. Absorbed inside the Model Fitter and
///     carried on the `FitResult` so the selector's fallback logic can keep
///     going; the reason stays inspectable for diagnostics.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Fewer than the minimum sample count survived ingestion/cleaning.
    #[error("insufficient data: {have} observations after cleaning, need at least {need}")]
    InsufficientData { have: usize, need: usize },

    /// Every candidate spec in the catalogue failed to fit.
    #[error("no usable model: all {candidates} candidate fits failed")]
    NoUsableModel { candidates: usize },
}

/// Why a single candidate fit was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitFailure {
    #[error("series too short: {have} observations, need at least {need}")]
    TooShort { have: usize, need: usize },

    /// Zero-variance input (e.g. constant prices) — the likelihood surface
    /// is flat and no conditional-variance model is identifiable.
    #[error("degenerate return series (sample variance below {0:e})")]
    DegenerateSeries(f64),

    #[error("optimizer did not converge within {max_iter} iterations")]
    NotConverged { max_iter: usize },

    #[error("log-likelihood non-finite at optimum")]
    DegenerateLikelihood,
}
