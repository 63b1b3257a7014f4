//! Average True Range (ATR).
//!
//! True range = max(high - low, |high - prev close|, |low - prev close|),
//! Wilder-smoothed over the period. First defined value at index period.

use crate::domain::Candle;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }

    fn true_range(candle: &Candle, prev_close: f64) -> f64 {
        let high_low = candle.high - candle.low;
        let high_prev = (candle.high - prev_close).abs();
        let low_prev = (candle.low - prev_close).abs();
        high_low.max(high_prev).max(low_prev)
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut result = vec![None; n];

        if n < self.period + 1 {
            return result;
        }

        // Seed: mean true range over the first `period` candle pairs.
        let mut sum = 0.0;
        for i in 1..=self.period {
            sum += Self::true_range(&candles[i], candles[i - 1].close);
        }
        let mut atr = sum / self.period as f64;
        result[self.period] = Some(atr);

        for i in (self.period + 1)..n {
            let tr = Self::true_range(&candles[i], candles[i - 1].close);
            atr = (atr * (self.period as f64 - 1.0) + tr) / self.period as f64;
            result[i] = Some(atr);
        }

        result
    }
}
