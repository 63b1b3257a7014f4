//! MACD — Moving Average Convergence/Divergence.
//!
//! Line = EMA(close, fast) - EMA(close, slow); signal = EMA(line, signal
//! period); histogram = line - signal. Three separate named instances per
//! part. Line defined from index slow - 1; signal and histogram from index
//! slow + signal - 2.

use crate::domain::Candle;
use crate::indicators::ema::Ema;
use crate::indicators::Indicator;

/// Which MACD series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdPart {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    part: MacdPart,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdPart::Line, "macd")
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdPart::Signal, "macd_signal")
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdPart::Histogram, "macd_hist")
    }

    fn build(fast: usize, slow: usize, signal: usize, part: MacdPart, name: &str) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be below slow period");
        Self {
            fast,
            slow,
            signal,
            part,
            name: name.to_string(),
        }
    }

    /// MACD line over the close series; `None` until the slow EMA is seeded.
    fn line_values(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let fast = Ema::over_values(self.fast, closes);
        let slow = Ema::over_values(self.slow, closes);
        fast.into_iter()
            .zip(slow)
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        match self.part {
            MacdPart::Line => self.slow,
            MacdPart::Signal | MacdPart::Histogram => self.slow + self.signal - 1,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let line = self.line_values(&closes);

        if self.part == MacdPart::Line {
            return line;
        }

        // Smooth the defined suffix of the line; re-align afterwards.
        let offset = line.iter().position(|v| v.is_some());
        let Some(offset) = offset else {
            return vec![None; n];
        };
        let defined: Vec<f64> = line[offset..].iter().copied().flatten().collect();
        let smoothed = Ema::over_values(self.signal, &defined);

        let mut signal_series = vec![None; n];
        for (i, v) in smoothed.into_iter().enumerate() {
            signal_series[offset + i] = v;
        }

        match self.part {
            MacdPart::Signal => signal_series,
            MacdPart::Histogram => line
                .into_iter()
                .zip(signal_series)
                .map(|(l, s)| match (l, s) {
                    (Some(l), Some(s)) => Some(l - s),
                    _ => None,
                })
                .collect(),
            MacdPart::Line => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn macd_line_warmup() {
        let candles = make_candles(&(1..=40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let result = Macd::line(3, 6, 4).compute(&candles);
        for i in 0..5 {
            assert!(result[i].is_none(), "expected None at {i}");
        }
        assert!(result[5].is_some());
    }

    #[test]
    fn macd_signal_warmup() {
        let closes: Vec<f64> = (1..=40).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);
        let result = Macd::signal(3, 6, 4).compute(&candles);
        // line defined from index 5, signal needs 4 line values → index 8
        for i in 0..8 {
            assert!(result[i].is_none(), "expected None at {i}");
        }
        assert!(result[8].is_some());
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let candles = make_candles(&closes);
        let line = Macd::line(3, 6, 4).compute(&candles);
        let signal = Macd::signal(3, 6, 4).compute(&candles);
        let hist = Macd::histogram(3, 6, 4).compute(&candles);
        for i in 0..40 {
            match (line[i], signal[i], hist[i]) {
                (Some(l), Some(s), Some(h)) => assert_approx(h, l - s, DEFAULT_EPSILON),
                (_, None, None) => {}
                other => panic!("inconsistent definedness at {i}: {other:?}"),
            }
        }
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let candles = make_candles(&[100.0; 30]);
        let line = Macd::line(3, 6, 4).compute(&candles);
        assert_approx(line[29].unwrap(), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_uptrend_is_positive() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let candles = make_candles(&closes);
        let line = Macd::line(5, 10, 4).compute(&candles);
        assert!(line[29].unwrap() > 0.0);
    }

    #[test]
    fn macd_min_bars() {
        assert_eq!(Macd::line(12, 26, 9).min_bars(), 26);
        assert_eq!(Macd::signal(12, 26, 9).min_bars(), 34);
        assert_eq!(Macd::histogram(12, 26, 9).min_bars(), 34);
    }
}
