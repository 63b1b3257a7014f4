//! SigLab Core — signal-aggregation and risk-constraint engine.
//!
//! The heart of the system:
//! - Domain types (candles, signals, setups, recommendations)
//! - Indicator engine over rolling candle windows
//! - Normalizer, category aggregator, and composite scorer
//! - Threshold classifier mapping score to a five-state signal
//! - Risk evaluator that vetoes or sizes a proposed action
//! - Market-structure helpers (key levels, volatility, trade planning)
//!
//! Everything here is pure and side-effect-free per evaluation; data
//! acquisition, persistence, and notification live behind the seams in
//! `data` and the output types.

pub mod analyzer;
pub mod classify;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod levels;
pub mod risk;
pub mod scoring;
pub mod setup;
pub mod volatility;

pub use analyzer::{Analysis, Analyzer};
pub use config::{AnalysisConfig, ConfigError};
pub use error::AnalyzeError;
