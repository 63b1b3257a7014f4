//! Exponential Moving Average (EMA).
//!
//! Seeded with the SMA of the first `period` closes, then smoothed with
//! alpha = 2 / (period + 1). First defined value at index period - 1.

use crate::domain::Candle;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    /// EMA over an arbitrary pre-extracted value series. Shared with MACD,
    /// which smooths its own line rather than raw closes.
    pub(crate) fn over_values(period: usize, values: &[f64]) -> Vec<Option<f64>> {
        let n = values.len();
        let mut result = vec![None; n];
        if n < period {
            return result;
        }

        let seed: f64 = values.iter().take(period).sum::<f64>() / period as f64;
        result[period - 1] = Some(seed);

        let alpha = 2.0 / (period as f64 + 1.0);
        let mut ema = seed;
        for i in period..n {
            ema = alpha * values[i] + (1.0 - alpha) * ema;
            result[i] = Some(ema);
        }
        result
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        Ema::over_values(self.period, &closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn ema_seed_is_sma() {
        let candles = make_candles(&[10.0, 12.0, 14.0, 16.0]);
        let result = Ema::new(3).compute(&candles);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        // seed = mean(10,12,14) = 12
        assert_approx(result[2].unwrap(), 12.0, DEFAULT_EPSILON);
        // alpha = 0.5: ema = 0.5*16 + 0.5*12 = 14
        assert_approx(result[3].unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_tracks_constant_series() {
        let candles = make_candles(&[50.0; 10]);
        let result = Ema::new(4).compute(&candles);
        for v in result.iter().skip(3) {
            assert_approx(v.unwrap(), 50.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_too_few_candles() {
        let candles = make_candles(&[10.0, 11.0]);
        assert!(Ema::new(5).compute(&candles).iter().all(|v| v.is_none()));
    }

    #[test]
    fn ema_min_bars() {
        assert_eq!(Ema::new(12).min_bars(), 12);
    }
}
