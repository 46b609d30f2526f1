/// config.rs — Centralised configuration loaded from .env
///
/// All thresholds consumed by the volatility engine are defined here.
/// Loading happens once at startup; every module borrows &EngineConfig.
/// Defaults reproduce the reference analysis exactly; each value can be
/// overridden via environment variable without recompiling.
use anyhow::Result;
use std::env;

use crate::models::Dist;

/// Minimum usable sample after cleaning (returns, not prices).
pub const DEFAULT_MIN_SAMPLE: usize = 500;
/// Ljung-Box lag count requested for the whiteness test.
pub const DEFAULT_LB_LAGS: usize = 20;
/// Whiteness acceptance threshold on the Ljung-Box p-value.
pub const DEFAULT_WHITENESS_THRESHOLD: f64 = 0.05;
/// Returns are multiplied by this before fitting (optimizer conditioning,
/// same convention as percent-scaled returns). Inverted once, in the
/// Volatility Estimator.
pub const DEFAULT_RETURN_SCALE: f64 = 100.0;
/// Trading periods per year for annualisation (daily bars).
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;
/// Hard cap on optimizer iterations per candidate fit.
pub const DEFAULT_MAX_ITER: usize = 1000;
/// Floor applied to (1 − persistence) when deriving long-run variance.
/// Masks non-stationary fits instead of emitting Inf/NaN.
pub const DEFAULT_PERSISTENCE_FLOOR: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    // ── Ingestion ────────────────────────────────────────────────────
    pub min_sample: usize,
    pub return_scale: f64,

    // ── Whiteness validation ─────────────────────────────────────────
    pub lb_lags: usize,
    pub whiteness_threshold: f64,

    // ── Fitting ──────────────────────────────────────────────────────
    pub max_iter: usize,
    /// Residual distribution assumption for the MLE.
    pub distribution: Dist,

    // ── Volatility estimation ────────────────────────────────────────
    pub periods_per_year: f64,
    pub persistence_floor: f64,

    // ── Interpretation rules ─────────────────────────────────────────
    pub interpret: InterpretThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_sample: DEFAULT_MIN_SAMPLE,
            return_scale: DEFAULT_RETURN_SCALE,
            lb_lags: DEFAULT_LB_LAGS,
            whiteness_threshold: DEFAULT_WHITENESS_THRESHOLD,
            max_iter: DEFAULT_MAX_ITER,
            distribution: Dist::Normal,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            persistence_floor: DEFAULT_PERSISTENCE_FLOOR,
            interpret: InterpretThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables (after dotenv).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // ignore missing .env

        let distribution = match env::var("VOL_DISTRIBUTION")
            .unwrap_or_else(|_| "normal".into())
            .to_lowercase()
            .as_str()
        {
            "studentt" | "t" => Dist::StudentT,
            _ => Dist::Normal,
        };

        Ok(Self {
            min_sample: parse_env("VOL_MIN_SAMPLE", DEFAULT_MIN_SAMPLE)?,
            return_scale: parse_env("VOL_RETURN_SCALE", DEFAULT_RETURN_SCALE)?,
            lb_lags: parse_env("VOL_LB_LAGS", DEFAULT_LB_LAGS)?,
            whiteness_threshold: parse_env("VOL_WHITENESS_THRESHOLD", DEFAULT_WHITENESS_THRESHOLD)?,
            max_iter: parse_env("VOL_MAX_ITER", DEFAULT_MAX_ITER)?,
            distribution,
            periods_per_year: parse_env("VOL_PERIODS_PER_YEAR", DEFAULT_PERIODS_PER_YEAR)?,
            persistence_floor: parse_env("VOL_PERSISTENCE_FLOOR", DEFAULT_PERSISTENCE_FLOOR)?,
            interpret: InterpretThresholds::from_env()?,
        })
    }
}

/// Threshold constants behind the Interpreter's classification rules.
/// Named and overridable rather than baked into the rule bodies.
#[derive(Debug, Clone)]
pub struct InterpretThresholds {
    /// EGARCH log-variance intercept below this → downside shocks amplify vol.
    pub egarch_leverage_strong: f64,
    /// EGARCH intercept below this → moderate leverage effect.
    pub egarch_leverage_moderate: f64,
    /// EGARCH intercept below this → panic-prone classification.
    pub egarch_panic: f64,
    /// beta_total above this → long volatility memory.
    pub beta_long_memory: f64,
    /// beta_total above this → persistent volatility.
    pub beta_persistent: f64,
    /// alpha_total above this → strong reaction to recent shocks.
    pub alpha_strong: f64,
    /// alpha_total above this → moderate reaction to shocks.
    pub alpha_moderate: f64,
    /// FX + symmetric GARCH: alpha below / beta above → classic FX regime.
    pub fx_alpha_max: f64,
    pub fx_beta_min: f64,
    /// Futures + symmetric GARCH: alpha above → technical futures vol.
    pub futures_alpha_min: f64,
    /// Equity + symmetric GARCH: alpha below → mature, above → volatile.
    pub equity_alpha_low: f64,
    pub equity_alpha_high: f64,
}

impl Default for InterpretThresholds {
    fn default() -> Self {
        Self {
            egarch_leverage_strong: -0.5,
            egarch_leverage_moderate: -0.2,
            egarch_panic: -0.3,
            beta_long_memory: 0.98,
            beta_persistent: 0.95,
            alpha_strong: 0.20,
            alpha_moderate: 0.10,
            fx_alpha_max: 0.07,
            fx_beta_min: 0.90,
            futures_alpha_min: 0.08,
            equity_alpha_low: 0.07,
            equity_alpha_high: 0.15,
        }
    }
}

impl InterpretThresholds {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            egarch_leverage_strong: parse_env("INTERP_EGARCH_STRONG", d.egarch_leverage_strong)?,
            egarch_leverage_moderate: parse_env("INTERP_EGARCH_MODERATE", d.egarch_leverage_moderate)?,
            egarch_panic: parse_env("INTERP_EGARCH_PANIC", d.egarch_panic)?,
            beta_long_memory: parse_env("INTERP_BETA_LONG_MEMORY", d.beta_long_memory)?,
            beta_persistent: parse_env("INTERP_BETA_PERSISTENT", d.beta_persistent)?,
            alpha_strong: parse_env("INTERP_ALPHA_STRONG", d.alpha_strong)?,
            alpha_moderate: parse_env("INTERP_ALPHA_MODERATE", d.alpha_moderate)?,
            fx_alpha_max: parse_env("INTERP_FX_ALPHA_MAX", d.fx_alpha_max)?,
            fx_beta_min: parse_env("INTERP_FX_BETA_MIN", d.fx_beta_min)?,
            futures_alpha_min: parse_env("INTERP_FUTURES_ALPHA_MIN", d.futures_alpha_min)?,
            equity_alpha_low: parse_env("INTERP_EQUITY_ALPHA_LOW", d.equity_alpha_low)?,
            equity_alpha_high: parse_env("INTERP_EQUITY_ALPHA_HIGH", d.equity_alpha_high)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Config key {key}: {e}")),
        Err(_) => Ok(default),
    }
}
