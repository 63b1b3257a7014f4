//! Engine-level errors.
//!
//! Data-quality problems degrade gracefully inside the pipeline (an
//! undefined indicator simply contributes nothing); `InsufficientData` only
//! fires when every indicator is undefined. Configuration problems are
//! fatal before any evaluation starts. Risk rejections are not errors at
//! all — they are ordinary `TradeRecommendation` values.

use crate::config::ConfigError;
use crate::data::SourceError;
use crate::domain::{CandleError, Timeframe};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(
        "insufficient data for {symbol} {timeframe}: no indicator produced a usable \
         score; still warming up: {}", undefined.join(", ")
    )]
    InsufficientData {
        symbol: String,
        timeframe: Timeframe,
        /// Names of the undefined indicators, for the caller's diagnostics.
        undefined: Vec<String>,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Candle(#[from] CandleError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_names_indicators() {
        let err = AnalyzeError::InsufficientData {
            symbol: "BTC/USDT".to_string(),
            timeframe: Timeframe::H1,
            undefined: vec!["rsi_14".to_string(), "macd".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("BTC/USDT"));
        assert!(msg.contains("rsi_14"));
        assert!(msg.contains("macd"));
    }
}
