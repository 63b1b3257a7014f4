//! Candle — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// OHLCV candle for a single symbol on a single timeframe interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Basic OHLCV sanity check: high >= low, high bounds open/close, positive prices.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }

    /// High-low range of the candle.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Candle interval.
///
/// Perpetual-futures markets trade around the clock, so annualization uses a
/// 365-day year at every interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    /// Interval length in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1_440,
            Timeframe::W1 => 10_080,
        }
    }

    /// Number of candles in a 365-day year at this interval.
    pub fn bars_per_year(&self) -> f64 {
        (365.0 * 24.0 * 60.0) / self.minutes() as f64
    }

    /// All supported timeframes, shortest first.
    pub fn all() -> [Timeframe; 8] {
        [
            Timeframe::M1,
            Timeframe::M5,
            Timeframe::M15,
            Timeframe::M30,
            Timeframe::H1,
            Timeframe::H4,
            Timeframe::D1,
            Timeframe::W1,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "1w",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| CandleError::UnknownTimeframe(s.to_string()))
    }
}

/// Errors constructing or validating candle data.
#[derive(Debug, Error)]
pub enum CandleError {
    #[error("candle series for {symbol} {timeframe} is empty")]
    Empty { symbol: String, timeframe: Timeframe },
    #[error(
        "candle series for {symbol} {timeframe} is not strictly increasing at index {index} \
         ({previous} then {offending})"
    )]
    OutOfOrder {
        symbol: String,
        timeframe: Timeframe,
        index: usize,
        previous: DateTime<Utc>,
        offending: DateTime<Utc>,
    },
    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),
}

/// Validated, ordered candle sequence for one (symbol, timeframe) pair.
///
/// Construction rejects empty input and any timestamp that is not strictly
/// greater than its predecessor, so downstream code can assume ordering and
/// uniqueness. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        candles: Vec<Candle>,
    ) -> Result<Self, CandleError> {
        let symbol = symbol.into();
        if candles.is_empty() {
            return Err(CandleError::Empty { symbol, timeframe });
        }
        for (index, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(CandleError::OutOfOrder {
                    symbol,
                    timeframe,
                    index: index + 1,
                    previous: pair[0].timestamp,
                    offending: pair[1].timestamp,
                });
            }
        }
        Ok(Self {
            symbol,
            timeframe,
            candles,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle. Construction guarantees at least one.
    pub fn last(&self) -> &Candle {
        self.candles.last().expect("CandleSeries is never empty")
    }

    /// Close of the most recent candle.
    pub fn last_price(&self) -> f64 {
        self.last().close
    }

    /// Close-to-close change of the most recent candle, as a fraction.
    pub fn last_change(&self) -> Option<f64> {
        let n = self.candles.len();
        if n < 2 {
            return None;
        }
        let prev = self.candles[n - 2].close;
        if prev == 0.0 {
            return None;
        }
        Some((self.candles[n - 1].close - prev) / prev)
    }
}
