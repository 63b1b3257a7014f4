//! Candle source seam — the engine's only inbound data dependency.
//!
//! Exchange connectivity, caching, and file formats live behind this trait
//! in external collaborators; the engine only ever sees a validated
//! `CandleSeries`.

use crate::domain::{CandleError, CandleSeries, Timeframe};
use thiserror::Error;

/// Errors a candle source may surface.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no candle data for {symbol} {timeframe}")]
    NotFound { symbol: String, timeframe: Timeframe },
    #[error("candle data failed validation: {0}")]
    Invalid(#[from] CandleError),
    #[error("candle source error: {0}")]
    Io(String),
}

/// Provider of candle windows.
///
/// Implementations must return candles sorted ascending by timestamp, at
/// most `lookback` of them (the most recent ones when truncating).
pub trait CandleSource: Send + Sync {
    fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<CandleSeries, SourceError>;
}

/// In-memory source over pre-built series. Used by tests and by callers
/// that already hold the data.
#[derive(Debug, Default)]
pub struct StaticSource {
    series: Vec<CandleSeries>,
}

impl StaticSource {
    pub fn new(series: Vec<CandleSeries>) -> Self {
        Self { series }
    }
}

impl CandleSource for StaticSource {
    fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<CandleSeries, SourceError> {
        let found = self
            .series
            .iter()
            .find(|s| s.symbol() == symbol && s.timeframe() == timeframe)
            .ok_or_else(|| SourceError::NotFound {
                symbol: symbol.to_string(),
                timeframe,
            })?;
        let candles = found.candles();
        let start = candles.len().saturating_sub(lookback);
        Ok(CandleSeries::new(
            symbol,
            timeframe,
            candles[start..].to_vec(),
        )?)
    }
}
