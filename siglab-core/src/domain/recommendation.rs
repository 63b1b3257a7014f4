//! Trade setup and the risk-gated recommendation produced per evaluation.

use crate::domain::{Direction, Signal, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entry, stop, and target prices for a proposed trade.
///
/// The stop must sit on the losing side of the entry and the target on the
/// winning side for the setup's direction; `risk_reward()` returns `None`
/// when the stop distance is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop_loss: f64,
    pub target: f64,
}

impl TradeSetup {
    /// Risk as a fraction of entry price.
    pub fn risk_pct(&self) -> f64 {
        (self.entry - self.stop_loss).abs() / self.entry
    }

    /// Reward as a fraction of entry price.
    pub fn reward_pct(&self) -> f64 {
        (self.target - self.entry).abs() / self.entry
    }

    /// Potential gain over potential loss; `None` when the stop sits on the entry.
    pub fn risk_reward(&self) -> Option<f64> {
        let risk = self.risk_pct();
        if risk == 0.0 {
            return None;
        }
        Some(self.reward_pct() / risk)
    }

    /// Direction implied by the stop placement: stop below entry means long.
    pub fn direction(&self) -> Direction {
        if self.stop_loss < self.entry {
            Direction::Long
        } else {
            Direction::Short
        }
    }
}

/// Why an evaluation produced a non-actionable recommendation.
///
/// Rejection is a normal outcome, not an error: the pipeline ran to
/// completion and the risk gate said no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Composite score landed in the neutral band.
    NeutralSignal,
    /// Proposed risk/reward ratio fell below the configured minimum.
    RiskRewardBelowMinimum,
    /// Directional signal without a stop/target context to validate against.
    NoTradeSetup,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::NeutralSignal => "neutral signal",
            RejectReason::RiskRewardBelowMinimum => "risk/reward below minimum",
            RejectReason::NoTradeSetup => "no trade setup supplied",
        };
        f.write_str(s)
    }
}

/// Final output of one pipeline evaluation for one (symbol, timeframe) pair.
///
/// `evaluated_at` is the timestamp of the last candle in the evaluated
/// window, never wall-clock time, so identical inputs yield identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecommendation {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub signal: Signal,
    pub composite_score: f64,
    /// Fraction of account equity to commit, in [0, max_position_size].
    pub recommended_position_size: f64,
    pub leverage: f64,
    pub risk_reward_ratio: Option<f64>,
    pub setup: Option<TradeSetup>,
    pub accepted: bool,
    pub rejection_reason: Option<RejectReason>,
    pub evaluated_at: DateTime<Utc>,
}

impl TradeRecommendation {
    /// True when the recommendation proposes opening a position.
    pub fn is_actionable(&self) -> bool {
        self.accepted && self.signal.is_actionable()
    }
}
