/// interpret.rs — Threshold rules over fitted dynamics
///
/// Classifies a selected model's dynamics into human-readable risk tags.
/// Rule groups are evaluated independently (multiple tags may attach);
/// within the leverage, persistence, shock and asset-class groups the
/// strongest matching rule wins. Thresholds come from the overridable
/// `InterpretThresholds` config, never inline constants.
///
/// Pure function, no side effects; when nothing fires the single `Stable`
/// tag is produced.
use serde::Serialize;

use crate::config::InterpretThresholds;
use crate::models::VolFamily;
use crate::params::NormalizedParameters;

/// Instrument class, derived externally from the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetClass {
    Equity,
    Fx,
    Futures,
    Index,
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssetClass::Equity => "EQUITY",
            AssetClass::Fx => "FX",
            AssetClass::Futures => "FUTURES",
            AssetClass::Index => "INDEX",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTag {
    /// EGARCH intercept deeply negative: downside moves blow volatility up.
    DownsideShocksAmplify,
    ModerateLeverage,
    MildLeverage,
    /// β_total near 1: variance shocks take a long time to decay.
    LongVolatilityMemory,
    PersistentVolatility,
    /// α_total high: volatility reacts strongly to recent news.
    StrongShockReaction,
    ModerateShockReaction,
    ClassicFxRegime,
    TechnicalFuturesVol,
    MatureEquity,
    VolatileEquity,
    PanicProne,
    Stable,
}

impl RiskTag {
    /// Report wording, as printed in the TXT/CSV outputs.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTag::DownsideShocksAmplify => "DOWNSIDE SHOCKS AMPLIFY VOLATILITY",
            RiskTag::ModerateLeverage => "MODERATE LEVERAGE EFFECT",
            RiskTag::MildLeverage => "MILD LEVERAGE EFFECT",
            RiskTag::LongVolatilityMemory => "LONG VOLATILITY MEMORY",
            RiskTag::PersistentVolatility => "PERSISTENT VOLATILITY",
            RiskTag::StrongShockReaction => "STRONG REACTION TO SHOCKS",
            RiskTag::ModerateShockReaction => "MODERATE REACTION TO SHOCKS",
            RiskTag::ClassicFxRegime => "CLASSIC FX REGIME",
            RiskTag::TechnicalFuturesVol => "TECHNICAL FUTURES VOLATILITY",
            RiskTag::MatureEquity => "MATURE EQUITY PROFILE",
            RiskTag::VolatileEquity => "VOLATILE EQUITY PROFILE",
            RiskTag::PanicProne => "PANIC-PRONE",
            RiskTag::Stable => "STABLE",
        }
    }
}

impl std::fmt::Display for RiskTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Apply the rule set. Returns at least one tag.
pub fn classify(
    family: VolFamily,
    params: &NormalizedParameters,
    asset_class: AssetClass,
    th: &InterpretThresholds,
) -> Vec<RiskTag> {
    let mut tags = Vec::new();

    // Leverage group (EGARCH log-variance intercept).
    if family == VolFamily::Egarch {
        if params.omega < th.egarch_leverage_strong {
            tags.push(RiskTag::DownsideShocksAmplify);
        } else if params.omega < th.egarch_leverage_moderate {
            tags.push(RiskTag::ModerateLeverage);
        } else if params.omega < 0.0 {
            tags.push(RiskTag::MildLeverage);
        }
    }

    // Persistence group.
    if params.beta_total > th.beta_long_memory {
        tags.push(RiskTag::LongVolatilityMemory);
    } else if params.beta_total > th.beta_persistent {
        tags.push(RiskTag::PersistentVolatility);
    }

    // Shock-reaction group.
    if params.alpha_total > th.alpha_strong {
        tags.push(RiskTag::StrongShockReaction);
    } else if params.alpha_total > th.alpha_moderate {
        tags.push(RiskTag::ModerateShockReaction);
    }

    // Asset-class group (symmetric GARCH only).
    if family == VolFamily::Garch {
        match asset_class {
            AssetClass::Fx
                if params.alpha_total < th.fx_alpha_max
                    && params.beta_total > th.fx_beta_min =>
            {
                tags.push(RiskTag::ClassicFxRegime);
            }
            AssetClass::Futures if params.alpha_total > th.futures_alpha_min => {
                tags.push(RiskTag::TechnicalFuturesVol);
            }
            AssetClass::Equity if params.alpha_total < th.equity_alpha_low => {
                tags.push(RiskTag::MatureEquity);
            }
            AssetClass::Equity if params.alpha_total > th.equity_alpha_high => {
                tags.push(RiskTag::VolatileEquity);
            }
            _ => {}
        }
    }

    // Panic flag (independent of the leverage group).
    if family == VolFamily::Egarch && params.omega < th.egarch_panic {
        tags.push(RiskTag::PanicProne);
    }

    if tags.is_empty() {
        tags.push(RiskTag::Stable);
    }
    tags
}
