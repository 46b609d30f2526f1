pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fit;
pub mod interpret;
pub mod models;
pub mod optim;
pub mod params;
pub mod pipeline;
pub mod returns;
pub mod select;
pub mod volatility;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{EngineConfig, InterpretThresholds};
pub use error::{EngineError, FitFailure};
pub use models::*;
