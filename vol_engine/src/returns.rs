/// returns.rs — Price ingestion and return transformation
///
/// ─────────────────────────────────────────────────────────────────────────
/// MATHEMATICAL SPECIFICATION
/// ─────────────────────────────────────────────────────────────────────────
///
///   Log return:  r_t = ln(P_t / P_{t−1})
///
///   Non-finite values (zero/negative prices, gaps) are DROPPED, not
///   imputed. Returns are then multiplied by a fixed scale factor
///   (default 100) so the optimizer works on well-conditioned magnitudes;
///   the scale is recorded on the series and inverted exactly once when
///   converting fitted variances back to real-world volatility units.
/// ─────────────────────────────────────────────────────────────────────────
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// One observation of the provider's price series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Chronologically ordered close-price series, produced by an external
/// provider and consumed once by the return transformer.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }
}

/// Cleaned, scaled return series. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    values: Vec<f64>,
    scale: f64,
}

impl ReturnSeries {
    /// Transform a price series into scaled log returns.
    ///
    /// Fails with `InsufficientData` when the price series is shorter than
    /// the minimum sample, or when fewer than the minimum count of finite
    /// returns survive cleaning.
    pub fn from_prices(prices: &PriceSeries, cfg: &EngineConfig) -> Result<Self, EngineError> {
        if prices.len() < cfg.min_sample {
            return Err(EngineError::InsufficientData {
                have: prices.len(),
                need: cfg.min_sample,
            });
        }

        let values: Vec<f64> = prices
            .points
            .windows(2)
            .map(|w| (w[1].close / w[0].close).ln() * cfg.return_scale)
            .filter(|r| r.is_finite())
            .collect();

        if values.len() < cfg.min_sample {
            return Err(EngineError::InsufficientData {
                have: values.len(),
                need: cfg.min_sample,
            });
        }

        Ok(Self {
            values,
            scale: cfg.return_scale,
        })
    }

    /// Wrap an already-computed return series (tests, alternate providers).
    /// `scale` must reflect any multiplicative conditioning already applied.
    pub fn from_raw(values: Vec<f64>, scale: f64) -> Self {
        Self { values, scale }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
