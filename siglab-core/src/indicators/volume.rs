//! Volume indicators: on-balance volume and the trailing volume baseline.

use crate::domain::Candle;
use crate::indicators::Indicator;

/// On-Balance Volume.
///
/// Cumulative volume signed by the close-to-close direction. The absolute
/// level is meaningless; scoring uses its slope over a trailing window.
#[derive(Debug, Clone)]
pub struct Obv {
    name: String,
}

impl Obv {
    pub fn new() -> Self {
        Self {
            name: "obv".to_string(),
        }
    }
}

impl Default for Obv {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut result = vec![None; n];
        if n == 0 {
            return result;
        }

        let mut obv = candles[0].volume;
        result[0] = Some(obv);
        for i in 1..n {
            let change = candles[i].close - candles[i - 1].close;
            if change > 0.0 {
                obv += candles[i].volume;
            } else if change < 0.0 {
                obv -= candles[i].volume;
            }
            result[i] = Some(obv);
        }
        result
    }
}

/// Rolling mean of volume — the baseline current volume is judged against.
#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("vol_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
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

        let mut sum: f64 = candles.iter().take(self.period).map(|c| c.volume).sum();
        result[self.period - 1] = Some(sum / self.period as f64);
        for i in self.period..n {
            sum += candles[i].volume - candles[i - self.period].volume;
            result[i] = Some(sum / self.period as f64);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn obv_accumulates_by_direction() {
        let mut candles = make_candles(&[100.0, 101.0, 100.0, 100.0]);
        for (i, c) in candles.iter_mut().enumerate() {
            c.volume = (i + 1) as f64 * 100.0;
        }
        let result = Obv::new().compute(&candles);
        // start 100, +200 (up), -300 (down), unchanged (flat)
        assert_approx(result[0].unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(result[1].unwrap(), 300.0, DEFAULT_EPSILON);
        assert_approx(result[2].unwrap(), 0.0, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn volume_sma_basic() {
        let mut candles = make_candles(&[1.0, 1.0, 1.0, 1.0]);
        let volumes = [100.0, 200.0, 300.0, 400.0];
        for (c, v) in candles.iter_mut().zip(volumes) {
            c.volume = v;
        }
        let result = VolumeSma::new(2).compute(&candles);
        assert!(result[0].is_none());
        assert_approx(result[1].unwrap(), 150.0, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 350.0, DEFAULT_EPSILON);
    }
}
