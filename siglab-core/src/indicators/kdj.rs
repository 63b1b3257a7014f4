//! KDJ stochastic oscillator.
//!
//! RSV = (close - lowest low) / (highest high - lowest low) * 100 over the
//! K period; K = SMA(RSV, d_period); D = SMA(K, j_period); J = 3K - 2D.
//! SMA smoothing matches the slow-stochastic convention. A zero high-low
//! range yields RSV = 50. Three separate named instances per line.

use crate::domain::Candle;
use crate::indicators::Indicator;

/// Which KDJ line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdjLine {
    K,
    D,
    J,
}

#[derive(Debug, Clone)]
pub struct Kdj {
    k_period: usize,
    d_period: usize,
    j_period: usize,
    line: KdjLine,
    name: String,
}

impl Kdj {
    pub fn k(k_period: usize, d_period: usize, j_period: usize) -> Self {
        Self::build(k_period, d_period, j_period, KdjLine::K, "kdj_k")
    }

    pub fn d(k_period: usize, d_period: usize, j_period: usize) -> Self {
        Self::build(k_period, d_period, j_period, KdjLine::D, "kdj_d")
    }

    pub fn j(k_period: usize, d_period: usize, j_period: usize) -> Self {
        Self::build(k_period, d_period, j_period, KdjLine::J, "kdj_j")
    }

    fn build(k_period: usize, d_period: usize, j_period: usize, line: KdjLine, name: &str) -> Self {
        assert!(
            k_period >= 1 && d_period >= 1 && j_period >= 1,
            "KDJ periods must be >= 1"
        );
        Self {
            k_period,
            d_period,
            j_period,
            line,
            name: name.to_string(),
        }
    }

    fn rsv(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let n = candles.len();
        let mut rsv = vec![None; n];
        if n < self.k_period {
            return rsv;
        }
        for i in (self.k_period - 1)..n {
            let window = &candles[(i + 1 - self.k_period)..=i];
            let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
            let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
            let range = highest - lowest;
            rsv[i] = Some(if range == 0.0 {
                50.0
            } else {
                (candles[i].close - lowest) / range * 100.0
            });
        }
        rsv
    }
}

/// SMA over the defined suffix of a partially-defined series, keeping
/// alignment with the input.
fn smooth(series: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let n = series.len();
    let mut result = vec![None; n];
    let Some(offset) = series.iter().position(|v| v.is_some()) else {
        return result;
    };
    let defined: Vec<f64> = series[offset..].iter().copied().flatten().collect();
    if defined.len() < period {
        return result;
    }
    let mut sum: f64 = defined.iter().take(period).sum();
    result[offset + period - 1] = Some(sum / period as f64);
    for i in period..defined.len() {
        sum += defined[i] - defined[i - period];
        result[offset + i] = Some(sum / period as f64);
    }
    result
}

impl Indicator for Kdj {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        match self.line {
            KdjLine::K => self.k_period + self.d_period - 1,
            KdjLine::D | KdjLine::J => self.k_period + self.d_period + self.j_period - 2,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let rsv = self.rsv(candles);
        let k = smooth(&rsv, self.d_period);
        match self.line {
            KdjLine::K => k,
            KdjLine::D => smooth(&k, self.j_period),
            KdjLine::J => {
                let d = smooth(&k, self.j_period);
                k.into_iter()
                    .zip(d)
                    .map(|(k, d)| match (k, d) {
                        (Some(k), Some(d)) => Some(3.0 * k - 2.0 * d),
                        _ => None,
                    })
                    .collect()
            }
        }
    }
}
