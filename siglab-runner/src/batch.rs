//! Parallel batch evaluation across (symbol, timeframe) pairs.
//!
//! Every pipeline invocation owns its candle window and reads the shared
//! immutable analyzer, so items fan out across a rayon pool with no
//! locking. Cancellation is cooperative: the flag is checked before each
//! item starts, a cancelled item produces no outcome, and an in-flight
//! item always completes — outcomes are atomic, never partial.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use siglab_core::data::CandleSource;
use siglab_core::domain::{MarketContext, Timeframe};
use siglab_core::{Analysis, AnalyzeError, Analyzer};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub symbol: String,
    pub timeframe: Timeframe,
}

/// Result of one unit; failures are outcomes, not batch aborts.
#[derive(Debug)]
pub struct BatchOutcome {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub result: Result<Analysis, AnalyzeError>,
}

/// Cross product of symbols and timeframes, symbol-major.
pub fn items_for(symbols: &[String], timeframes: &[Timeframe]) -> Vec<BatchItem> {
    symbols
        .iter()
        .flat_map(|symbol| {
            timeframes.iter().map(move |&timeframe| BatchItem {
                symbol: symbol.clone(),
                timeframe,
            })
        })
        .collect()
}

/// Evaluate every item, in parallel when `threads` allows.
///
/// Items cancelled before they started are absent from the returned list;
/// everything else appears exactly once, in input order.
pub fn run_batch(
    analyzer: &Analyzer,
    source: &dyn CandleSource,
    items: &[BatchItem],
    threads: Option<usize>,
    cancel: Option<&AtomicBool>,
) -> Vec<BatchOutcome> {
    info!(items = items.len(), "starting batch evaluation");

    let evaluate = |item: &BatchItem| -> Option<BatchOutcome> {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return None;
        }
        Some(run_item(analyzer, source, item))
    };

    let outcomes: Vec<BatchOutcome> = match threads {
        Some(n) if n > 1 => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .expect("failed to build rayon thread pool");
            pool.install(|| items.par_iter().filter_map(evaluate).collect())
        }
        Some(_) => items.iter().filter_map(evaluate).collect(),
        None => items.par_iter().filter_map(evaluate).collect(),
    };

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        completed = outcomes.len(),
        failed,
        skipped = items.len() - outcomes.len(),
        "batch evaluation finished"
    );
    outcomes
}

fn run_item(analyzer: &Analyzer, source: &dyn CandleSource, item: &BatchItem) -> BatchOutcome {
    let result = source
        .candles(
            &item.symbol,
            item.timeframe,
            analyzer.config().max_lookback_bars,
        )
        .map_err(AnalyzeError::from)
        .and_then(|series| analyzer.analyze_series(&series, &MarketContext::default()));

    if let Err(err) = &result {
        warn!(
            symbol = %item.symbol,
            timeframe = %item.timeframe,
            %err,
            "batch item failed"
        );
    }

    BatchOutcome {
        symbol: item.symbol.clone(),
        timeframe: item.timeframe,
        result,
    }
}
