//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices. First defined value at index period - 1.

use crate::domain::Candle;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        let mut sum: f64 = candles.iter().take(self.period).map(|c| c.close).sum();
        result[self.period - 1] = Some(sum / self.period as f64);

        for i in self.period..n {
            sum += candles[i].close - candles[i - self.period].close;
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}
