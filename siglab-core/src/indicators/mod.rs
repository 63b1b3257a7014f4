//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait: candle history in, a
//! per-candle series of `Option<f64>` out. A value is `None` inside the
//! warm-up window and for every candle when the window is shorter than
//! `min_bars()` — never approximated from partial data.
//!
//! Multi-series indicators (KDJ, MACD, Bollinger) are exposed as separate
//! named instances per line, keeping the single-series trait unchanged.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use kdj::{Kdj, KdjLine};
pub use macd::{Macd, MacdPart};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume::{Obv, VolumeSma};

use crate::domain::Candle;
use std::collections::HashMap;

/// Trait for indicators.
///
/// Indicators are pure functions of the candle window and their parameters.
/// The output series is aligned 1:1 with the input; the first `min_bars() - 1`
/// values are `None`.
pub trait Indicator: Send + Sync {
    /// Series name (e.g., "sma_20", "kdj_k").
    fn name(&self) -> &str;

    /// Number of candles needed before the first defined value.
    fn min_bars(&self) -> usize;

    /// Compute the indicator for the entire candle window.
    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>>;
}

/// Container for computed indicator series, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    series: HashMap<String, Vec<Option<f64>>>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        self.series.insert(name.into(), values);
    }

    /// Value at a specific candle index; `None` for unknown name, out-of-range
    /// index, or warm-up.
    pub fn at(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(index).copied())?
    }

    /// Most recent value of a named series.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.series.get(name).and_then(|v| v.last().copied())?
    }

    /// Full series for a name.
    pub fn series(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Names with no defined value anywhere in the window.
    pub fn undefined_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .series
            .iter()
            .filter(|(_, v)| v.iter().all(|x| x.is_none()))
            .map(|(k, _)| k.clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first),
/// high/low bracket the body by 1.0, volume = 1000, hourly spacing.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
