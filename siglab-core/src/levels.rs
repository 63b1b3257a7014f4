//! Support and resistance identification.
//!
//! Fractal local extremes (higher/lower than two candles on each side),
//! merged when within 0.5% of each other, then the nearest levels on each
//! side of the current price. When the window yields too few levels, the
//! remainder is projected from ATR so the trade planner always has a
//! reference on both sides.

use crate::domain::Candle;

/// Two candles on each side define a fractal extreme.
const FRACTAL_WING: usize = 2;
/// Levels closer than this fraction of price are merged.
const MERGE_THRESHOLD: f64 = 0.005;

/// Nearest-first support and resistance levels around the current price.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyLevels {
    /// Below current price, nearest first (descending).
    pub support: Vec<f64>,
    /// Above current price, nearest first (ascending).
    pub resistance: Vec<f64>,
}

impl KeyLevels {
    /// Nearest support below the given price.
    pub fn nearest_support(&self, price: f64) -> Option<f64> {
        self.support.iter().copied().find(|&s| s < price)
    }

    /// Nearest resistance above the given price.
    pub fn nearest_resistance(&self, price: f64) -> Option<f64> {
        self.resistance.iter().copied().find(|&r| r > price)
    }
}

/// Identify up to `n_levels` support and resistance levels.
pub fn identify(candles: &[Candle], atr: Option<f64>, n_levels: usize) -> KeyLevels {
    let n = candles.len();
    let current = match candles.last() {
        Some(c) => c.close,
        None => return KeyLevels::default(),
    };

    let mut highs = Vec::new();
    let mut lows = Vec::new();
    if n > 2 * FRACTAL_WING {
        for i in FRACTAL_WING..(n - FRACTAL_WING) {
            let is_high = (1..=FRACTAL_WING)
                .all(|w| candles[i].high > candles[i - w].high && candles[i].high > candles[i + w].high);
            let is_low = (1..=FRACTAL_WING)
                .all(|w| candles[i].low < candles[i - w].low && candles[i].low < candles[i + w].low);
            if is_high {
                highs.push(candles[i].high);
            }
            if is_low {
                lows.push(candles[i].low);
            }
        }
    }

    let highs = merge_levels(highs);
    let lows = merge_levels(lows);

    let mut resistance: Vec<f64> = highs.into_iter().filter(|&p| p > current).collect();
    resistance.sort_by(|a, b| a.total_cmp(b));
    resistance.truncate(n_levels);

    let mut support: Vec<f64> = lows.into_iter().filter(|&p| p < current).collect();
    support.sort_by(|a, b| b.total_cmp(a));
    support.truncate(n_levels);

    // Project missing levels off ATR steps from the current price.
    if let Some(atr) = atr {
        let mut step = 1;
        while resistance.len() < n_levels {
            resistance.push(current + 0.5 * step as f64 * atr);
            step += 1;
        }
        let mut step = 1;
        while support.len() < n_levels {
            support.push((current - 0.5 * step as f64 * atr).max(0.0));
            step += 1;
        }
        resistance.sort_by(|a, b| a.total_cmp(b));
        support.sort_by(|a, b| b.total_cmp(a));
    }

    KeyLevels {
        support,
        resistance,
    }
}

/// Merge levels within `MERGE_THRESHOLD` of each other into their mean.
fn merge_levels(mut levels: Vec<f64>) -> Vec<f64> {
    if levels.is_empty() {
        return levels;
    }
    levels.sort_by(|a, b| a.total_cmp(b));
    let mut merged = Vec::new();
    let mut current = levels[0];
    for &level in &levels[1..] {
        if (level - current).abs() / current < MERGE_THRESHOLD {
            current = (current + level) / 2.0;
        } else {
            merged.push(current);
            current = level;
        }
    }
    merged.push(current);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Candles with explicit highs/lows; fractal detection needs distinct
    /// extremes, which the close-derived test helper cannot guarantee.
    fn candles_from(hlc: &[(f64, f64, f64)]) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        hlc.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| Candle {
                timestamp: base + Duration::hours(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    #[test]
    fn fractal_extremes_become_levels() {
        // Clear peak high of 120 and trough low of 80 in a window ending at 100.
        let candles = candles_from(&[
            (102.0, 98.0, 100.0),
            (107.0, 101.0, 105.0),
            (120.0, 104.0, 112.0), // fractal high
            (108.0, 100.0, 105.0),
            (102.0, 95.0, 100.0),
            (98.0, 88.0, 90.0),
            (92.0, 80.0, 85.0), // fractal low
            (95.0, 86.0, 90.0),
            (99.0, 91.0, 95.0),
            (103.0, 96.0, 100.0),
        ]);
        let levels = identify(&candles, None, 2);
        assert!(levels.resistance.iter().any(|&r| (r - 120.0).abs() < 1e-9));
        assert!(levels.support.iter().any(|&s| (s - 80.0).abs() < 1e-9));
    }

    #[test]
    fn atr_projection_fills_missing_levels() {
        // Monotone series has no interior fractal extremes on either side.
        let hlc: Vec<(f64, f64, f64)> = (0..10)
            .map(|i| {
                let close = 100.0 + i as f64;
                (close + 1.0, close - 1.0, close)
            })
            .collect();
        let candles = candles_from(&hlc);
        let levels = identify(&candles, Some(4.0), 2);
        assert_eq!(levels.resistance.len(), 2);
        assert_eq!(levels.support.len(), 2);
        let price = 109.0;
        assert!((levels.resistance[0] - (price + 2.0)).abs() < 1e-9);
        assert!((levels.resistance[1] - (price + 4.0)).abs() < 1e-9);
        assert!(levels.support[0] < price);
    }

    #[test]
    fn nearest_accessors() {
        let levels = KeyLevels {
            support: vec![95.0, 90.0],
            resistance: vec![105.0, 110.0],
        };
        assert_eq!(levels.nearest_support(100.0), Some(95.0));
        assert_eq!(levels.nearest_resistance(100.0), Some(105.0));
        assert_eq!(levels.nearest_support(80.0), None);
    }

    #[test]
    fn merge_collapses_close_levels() {
        let merged = merge_levels(vec![100.0, 100.3, 150.0]);
        assert_eq!(merged.len(), 2);
        assert!((merged[0] - 100.15).abs() < 1e-9);
    }

    #[test]
    fn empty_window_yields_no_levels() {
        let levels = identify(&[], Some(2.0), 2);
        assert!(levels.support.is_empty());
        assert!(levels.resistance.is_empty());
    }
}
