//! Discrete trading signal derived from the composite score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a directional trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

/// Five-state signal label.
///
/// Derived deterministically from the composite score via the configured
/// threshold cut points; carries no memory between evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Signal {
    /// True for every label except `Neutral`.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Neutral)
    }

    /// Trade side implied by the label, `None` for `Neutral`.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Signal::StrongBuy | Signal::Buy => Some(Direction::Long),
            Signal::Sell | Signal::StrongSell => Some(Direction::Short),
            Signal::Neutral => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::StrongBuy => "STRONG_BUY",
            Signal::Buy => "BUY",
            Signal::Neutral => "NEUTRAL",
            Signal::Sell => "SELL",
            Signal::StrongSell => "STRONG_SELL",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("long"),
            Direction::Short => f.write_str("short"),
        }
    }
}
