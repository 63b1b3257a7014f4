//! TOML configuration file for the runner and CLI.
//!
//! The file composes the core's serializable parameter structs plus the
//! batch plan (symbols, timeframes, threading). Every section is optional
//! and falls back to the defaults; whatever is loaded passes through the
//! core's validation before an analyzer is built, so a malformed file
//! fails fast with the offending field named.

use serde::{Deserialize, Serialize};
use siglab_core::config::{
    AnalysisConfig, CategoryWeights, ConfigError, IndicatorParams, RiskParameters,
    SignalThresholds,
};
use siglab_core::domain::Timeframe;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
    #[error("batch.symbols must not be empty")]
    NoSymbols,
    #[error("batch.timeframes must not be empty")]
    NoTimeframes,
}

/// Which markets to evaluate, and with how many workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Timeframe>,
    /// Worker threads for the batch; `None` uses one per item up to the
    /// rayon default.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Default for BatchPlan {
    fn default() -> Self {
        Self {
            symbols: vec!["BTC/USDT".to_string(), "ETH/USDT".to_string()],
            timeframes: vec![Timeframe::H1, Timeframe::H4, Timeframe::D1],
            threads: None,
        }
    }
}

/// Signal section: thresholds and category weights together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSection {
    #[serde(default)]
    pub thresholds: SignalThresholds,
    #[serde(default)]
    pub weights: CategoryWeights,
}

/// Top-level config file model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_lookback")]
    pub max_lookback_bars: usize,
    #[serde(default)]
    pub batch: BatchPlan,
    #[serde(default)]
    pub indicators: IndicatorParams,
    #[serde(default)]
    pub signal: SignalSection,
    #[serde(default)]
    pub risk: RiskParameters,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            max_lookback_bars: default_lookback(),
            batch: BatchPlan::default(),
            indicators: IndicatorParams::default(),
            signal: SignalSection::default(),
            risk: RiskParameters::default(),
        }
    }
}

fn default_lookback() -> usize {
    500
}

impl FileConfig {
    /// Assemble the core configuration. Does not validate; that happens in
    /// `Analyzer::new` (or explicitly via `AnalysisConfig::validate`).
    pub fn to_analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            indicators: self.indicators.clone(),
            thresholds: self.signal.thresholds,
            weights: self.signal.weights,
            risk: self.risk,
            max_lookback_bars: self.max_lookback_bars,
        }
    }

    fn validate_batch(&self) -> Result<(), ConfigFileError> {
        if self.batch.symbols.is_empty() {
            return Err(ConfigFileError::NoSymbols);
        }
        if self.batch.timeframes.is_empty() {
            return Err(ConfigFileError::NoTimeframes);
        }
        Ok(())
    }
}

/// Load and fully validate a config file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigFileError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FileConfig = toml::from_str(&raw).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate_batch()?;
    config.to_analysis_config().validate()?;
    Ok(config)
}
