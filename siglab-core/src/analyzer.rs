//! Analyzer — the single entry point wiring the pipeline stages together.
//!
//! candles → indicator values → normalized sub-scores → category scores →
//! composite score → signal label → risk-gated recommendation. Each call
//! owns its candle window and reads the shared immutable configuration, so
//! evaluations for different symbols and timeframes can run concurrently.

use crate::classify::{classify, stars};
use crate::config::{AnalysisConfig, ConfigError};
use crate::data::CandleSource;
use crate::domain::{
    AccountContext, CandleSeries, MarketContext, Signal, Symbol, Timeframe,
    TradeRecommendation,
};
use crate::engine::{IndicatorEngine, IndicatorSnapshot};
use crate::error::AnalyzeError;
use crate::fingerprint::config_fingerprint;
use crate::levels::{self, KeyLevels};
use crate::risk::RiskEvaluator;
use crate::scoring::{composite, CategoryScores, Normalizer, ScoreCard};
use crate::setup;
use crate::volatility::{self, VolatilityProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Support/resistance levels tracked on each side of the price.
const N_LEVELS: usize = 2;
/// Trailing window for the volatility profile.
const VOLATILITY_WINDOW: usize = 20;

/// Complete result of one evaluation, for the report and persistence
/// collaborators. `recommendation` alone is the contract most callers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub evaluated_at: DateTime<Utc>,
    pub last_price: f64,
    /// Close-to-close change of the last candle, as a fraction.
    pub change_pct: Option<f64>,
    pub snapshot: IndicatorSnapshot,
    pub scores: ScoreCard,
    pub categories: CategoryScores,
    pub composite_score: f64,
    pub signal: Signal,
    pub stars: u8,
    pub levels: KeyLevels,
    pub volatility: Option<VolatilityProfile>,
    pub context: MarketContext,
    pub recommendation: TradeRecommendation,
    /// Indicators still inside their warm-up window for this evaluation.
    pub degraded: Vec<String>,
    pub config_fingerprint: String,
}

/// The signal-aggregation and risk-constraint engine.
///
/// Holds a validated, immutable configuration; `Analyzer::new` is the fail-
/// fast gate for configuration errors.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    fingerprint: String,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fingerprint = config_fingerprint(&config);
        Ok(Self {
            config,
            fingerprint,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fetch the candle window from the source and evaluate it.
    ///
    /// Deterministic given identical candle input and configuration.
    pub fn analyze(
        &self,
        source: &dyn CandleSource,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<TradeRecommendation, AnalyzeError> {
        let series = source.candles(symbol, timeframe, self.config.max_lookback_bars)?;
        self.analyze_series(&series, &MarketContext::default())
            .map(|analysis| analysis.recommendation)
    }

    /// Run the full pipeline over a caller-supplied candle window.
    pub fn analyze_series(
        &self,
        series: &CandleSeries,
        context: &MarketContext,
    ) -> Result<Analysis, AnalyzeError> {
        let symbol = series.symbol().to_string();
        let timeframe = series.timeframe();
        debug!(%symbol, %timeframe, candles = series.len(), "analyzing window");

        let set = IndicatorEngine::compute(series, &self.config.indicators);
        let card = Normalizer::normalize(&set, series, context, &self.config.indicators);
        let categories = CategoryScores::aggregate(&card);

        let degraded = set.undefined_names();
        let Some(composite_score) = composite(&categories, &self.config.weights) else {
            return Err(AnalyzeError::InsufficientData {
                symbol,
                timeframe,
                undefined: degraded,
            });
        };
        if !degraded.is_empty() {
            warn!(
                %symbol,
                %timeframe,
                undefined = degraded.len(),
                "evaluation degraded: some indicators still warming up"
            );
        }

        let signal = classify(composite_score, &self.config.thresholds);
        let snapshot = IndicatorSnapshot::from_set(&set, series, &self.config.indicators);
        let key_levels = levels::identify(series.candles(), snapshot.atr, N_LEVELS);
        let vol = volatility::analyze(series, VOLATILITY_WINDOW);

        let planned = signal
            .direction()
            .map(|direction| setup::plan(direction, series.last(), &key_levels, snapshot.atr));
        let account = AccountContext {
            setup: planned,
            volatility: vol.map(|v| v.current),
        };

        let evaluated_at = series.last().timestamp;
        let recommendation = RiskEvaluator::evaluate(
            &symbol,
            timeframe,
            signal,
            composite_score,
            evaluated_at,
            &account,
            &self.config.risk,
        );
        debug!(
            %symbol,
            %timeframe,
            score = composite_score,
            %signal,
            accepted = recommendation.accepted,
            "evaluation complete"
        );

        Ok(Analysis {
            symbol,
            timeframe,
            evaluated_at,
            last_price: series.last_price(),
            change_pct: series.last_change(),
            snapshot,
            scores: card,
            categories,
            composite_score,
            signal,
            stars: stars(composite_score, &self.config.thresholds),
            levels: key_levels,
            volatility: vol,
            context: *context,
            recommendation,
            degraded,
            config_fingerprint: self.fingerprint.clone(),
        })
    }
}
