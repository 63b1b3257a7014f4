//! Immutable analysis configuration, validated before the pipeline runs.
//!
//! Configuration problems are fatal and surface as `ConfigError` naming the
//! offending field — they are never silently corrected. A validated config is
//! passed by reference into every pipeline invocation, so evaluations across
//! symbols and timeframes can run concurrently without shared mutable state.

use crate::scoring::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration, detected at load time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("category weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },
    #[error("weight for {category} must be finite and non-negative, got {value}")]
    InvalidWeight { category: Category, value: f64 },
    #[error(
        "signal thresholds must be strictly descending: {field} ({value}) \
         must be below {above_field} ({above})"
    )]
    ThresholdOrder {
        field: &'static str,
        value: f64,
        above_field: &'static str,
        above: f64,
    },
    #[error("signal threshold {field} must lie in [0, 100], got {value}")]
    ThresholdRange { field: &'static str, value: f64 },
    #[error("{field} must be {requirement}, got {value}")]
    RiskParam {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("{field} must be at least 1")]
    ZeroPeriod { field: String },
    #[error("ma_periods must not be empty")]
    EmptyMaPeriods,
    #[error("macd fast_period ({fast}) must be below slow_period ({slow})")]
    MacdPeriods { fast: usize, slow: usize },
    #[error("{indicator} oversold bound ({oversold}) must be below overbought bound ({overbought})")]
    OscillatorBounds {
        indicator: &'static str,
        oversold: f64,
        overbought: f64,
    },
    #[error(
        "max_lookback_bars ({max_lookback_bars}) is smaller than the longest \
         indicator warm-up ({required} bars)"
    )]
    LookbackTooSmall {
        max_lookback_bars: usize,
        required: usize,
    },
    #[error("bollinger std_dev must be positive, got {0}")]
    BollingerStdDev(f64),
}

/// RSI parameters with the overbought/oversold bounds used for normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiParams {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

/// KDJ stochastic parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdjParams {
    pub k_period: usize,
    pub d_period: usize,
    pub j_period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self {
            k_period: 9,
            d_period: 3,
            j_period: 3,
            overbought: 80.0,
            oversold: 20.0,
        }
    }
}

/// MACD parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Bollinger Band parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// All indicator parameters for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Moving-average periods; one SMA and one EMA instance per entry.
    pub ma_periods: Vec<usize>,
    pub rsi: RsiParams,
    pub kdj: KdjParams,
    pub macd: MacdParams,
    pub bollinger: BollingerParams,
    pub atr_period: usize,
    /// Trailing window for the volume baseline and OBV slope.
    pub volume_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_periods: vec![5, 10, 20, 50, 100, 200],
            rsi: RsiParams::default(),
            kdj: KdjParams::default(),
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
            atr_period: 14,
            volume_period: 20,
        }
    }
}

impl IndicatorParams {
    /// Longest warm-up any configured indicator needs before producing a value.
    pub fn required_warmup(&self) -> usize {
        let ma = self.ma_periods.iter().copied().max().unwrap_or(0);
        let rsi = self.rsi.period + 1;
        let kdj = self.kdj.k_period + self.kdj.d_period + self.kdj.j_period;
        let macd = self.macd.slow_period + self.macd.signal_period;
        let boll = self.bollinger.period;
        let atr = self.atr_period + 1;
        let vol = self.volume_period + 1;
        [ma, rsi, kdj, macd, boll, atr, vol]
            .into_iter()
            .max()
            .unwrap_or(0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ma_periods.is_empty() {
            return Err(ConfigError::EmptyMaPeriods);
        }
        let periods: [(&str, usize); 8] = [
            ("rsi.period", self.rsi.period),
            ("kdj.k_period", self.kdj.k_period),
            ("kdj.d_period", self.kdj.d_period),
            ("kdj.j_period", self.kdj.j_period),
            ("macd.fast_period", self.macd.fast_period),
            ("macd.signal_period", self.macd.signal_period),
            ("bollinger.period", self.bollinger.period),
            ("atr_period", self.atr_period),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod {
                    field: field.to_string(),
                });
            }
        }
        for (i, &p) in self.ma_periods.iter().enumerate() {
            if p == 0 {
                return Err(ConfigError::ZeroPeriod {
                    field: format!("ma_periods[{i}]"),
                });
            }
        }
        if self.volume_period == 0 {
            return Err(ConfigError::ZeroPeriod {
                field: "volume_period".to_string(),
            });
        }
        if self.macd.fast_period >= self.macd.slow_period {
            return Err(ConfigError::MacdPeriods {
                fast: self.macd.fast_period,
                slow: self.macd.slow_period,
            });
        }
        if self.bollinger.std_dev <= 0.0 {
            return Err(ConfigError::BollingerStdDev(self.bollinger.std_dev));
        }
        if self.rsi.oversold >= self.rsi.overbought {
            return Err(ConfigError::OscillatorBounds {
                indicator: "rsi",
                oversold: self.rsi.oversold,
                overbought: self.rsi.overbought,
            });
        }
        if self.kdj.oversold >= self.kdj.overbought {
            return Err(ConfigError::OscillatorBounds {
                indicator: "kdj",
                oversold: self.kdj.oversold,
                overbought: self.kdj.overbought,
            });
        }
        Ok(())
    }
}

/// Descending cut points turning a composite score into a signal label.
///
/// Each cut is the inclusive lower bound of its band; the lowest band has no
/// lower bound. With the defaults, 60 classifies as BUY and 39.999 as SELL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub neutral: f64,
    pub sell: f64,
    pub strong_sell: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            strong_buy: 80.0,
            buy: 60.0,
            neutral: 40.0,
            sell: 20.0,
            strong_sell: 0.0,
        }
    }
}

impl SignalThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("strong_buy", self.strong_buy),
            ("buy", self.buy),
            ("neutral", self.neutral),
            ("sell", self.sell),
            ("strong_sell", self.strong_sell),
        ];
        for (field, value) in fields {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ThresholdRange { field, value });
            }
        }
        for pair in fields.windows(2) {
            let (above_field, above) = pair[0];
            let (field, value) = pair[1];
            if value >= above {
                return Err(ConfigError::ThresholdOrder {
                    field,
                    value,
                    above_field,
                    above,
                });
            }
        }
        Ok(())
    }
}

/// Per-category weights for the composite score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub trend: f64,
    pub oscillators: f64,
    pub volume: f64,
    pub sentiment: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            trend: 0.3,
            oscillators: 0.3,
            volume: 0.2,
            sentiment: 0.2,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Trend => self.trend,
            Category::Oscillators => self.oscillators,
            Category::Volume => self.volume,
            Category::Sentiment => self.sentiment,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::all() {
            let value = self.get(category);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { category, value });
            }
        }
        let sum = self.trend + self.oscillators + self.volume + self.sentiment;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

/// Hard bounds the risk evaluator enforces on every recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    /// Ceiling on position size as a fraction of equity, in (0, 1].
    pub max_position_size: f64,
    /// Ceiling on leverage, >= 1.
    pub max_leverage: f64,
    /// Minimum acceptable risk/reward ratio, > 0.
    pub min_risk_reward: f64,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            max_position_size: 0.25,
            max_leverage: 20.0,
            min_risk_reward: 1.5,
        }
    }
}

impl RiskParameters {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_position_size > 0.0 && self.max_position_size <= 1.0) {
            return Err(ConfigError::RiskParam {
                field: "max_position_size",
                requirement: "in (0, 1]",
                value: self.max_position_size,
            });
        }
        if !(self.max_leverage >= 1.0) {
            return Err(ConfigError::RiskParam {
                field: "max_leverage",
                requirement: "at least 1",
                value: self.max_leverage,
            });
        }
        if !(self.min_risk_reward > 0.0) {
            return Err(ConfigError::RiskParam {
                field: "min_risk_reward",
                requirement: "positive",
                value: self.min_risk_reward,
            });
        }
        Ok(())
    }
}

/// Complete validated configuration for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub thresholds: SignalThresholds,
    pub weights: CategoryWeights,
    pub risk: RiskParameters,
    /// Upper bound on the candle window requested from the data collaborator.
    pub max_lookback_bars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
            weights: CategoryWeights::default(),
            risk: RiskParameters::default(),
            max_lookback_bars: 500,
        }
    }
}

impl AnalysisConfig {
    /// Validate every field. Called once by `Analyzer::new`; configuration
    /// problems never reach the scoring stages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.thresholds.validate()?;
        self.weights.validate()?;
        self.risk.validate()?;
        let required = self.indicators.required_warmup();
        if self.max_lookback_bars < required {
            return Err(ConfigError::LookbackTooSmall {
                max_lookback_bars: self.max_lookback_bars,
                required,
            });
        }
        Ok(())
    }
}
