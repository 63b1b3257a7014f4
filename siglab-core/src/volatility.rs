//! Close-to-close volatility profile.
//!
//! Annualized standard deviation of returns over the trailing window,
//! compared against the average of the rolling windows across the whole
//! candle window, then banded. Annualization uses the timeframe's 365-day
//! candle count — perpetual markets do not close.

use crate::domain::CandleSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityState {
    Low,
    Normal,
    High,
}

impl fmt::Display for VolatilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolatilityState::Low => "low",
            VolatilityState::Normal => "normal",
            VolatilityState::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityProfile {
    /// Annualized volatility of the most recent window.
    pub current: f64,
    /// Mean of the rolling-window volatilities over the full candle window.
    pub average: f64,
    pub state: VolatilityState,
}

/// Compute the profile over the trailing `window` returns.
///
/// Returns `None` when the series is too short for even one full window.
pub fn analyze(series: &CandleSeries, window: usize) -> Option<VolatilityProfile> {
    let candles = series.candles();
    if window < 2 || candles.len() < window + 1 {
        return None;
    }

    let returns: Vec<f64> = candles
        .windows(2)
        .map(|pair| (pair[1].close - pair[0].close) / pair[0].close)
        .collect();

    let annualize = series.timeframe().bars_per_year().sqrt();
    let current = stddev(&returns[returns.len() - window..]) * annualize;

    let mut rolling = Vec::new();
    for chunk in returns.windows(window) {
        rolling.push(stddev(chunk) * annualize);
    }
    let average = rolling.iter().sum::<f64>() / rolling.len() as f64;

    let state = if current > average * 1.5 {
        VolatilityState::High
    } else if current < average * 0.5 {
        VolatilityState::Low
    } else {
        VolatilityState::Normal
    };

    Some(VolatilityProfile {
        current,
        average,
        state,
    })
}

fn stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}
