//! Signal classifier — composite score to discrete label.

use crate::config::SignalThresholds;
use crate::domain::Signal;

/// Map a composite score onto a signal label.
///
/// Pure function of the score: each configured cut point is the inclusive
/// lower bound of its band, the band above is open at that edge, and the
/// lowest band has no lower bound. The thresholds were validated strictly
/// descending at config load, so the bands cover [0,100] with no gaps or
/// overlaps.
pub fn classify(score: f64, thresholds: &SignalThresholds) -> Signal {
    if score >= thresholds.strong_buy {
        Signal::StrongBuy
    } else if score >= thresholds.buy {
        Signal::Buy
    } else if score >= thresholds.neutral {
        Signal::Neutral
    } else if score >= thresholds.sell {
        Signal::Sell
    } else {
        Signal::StrongSell
    }
}

/// Star rating (1-5) for how emphatic the score is.
///
/// Five stars at or beyond the extreme cut points, four inside the buy/sell
/// bands, then fixed bands around the 50 midpoint for the weaker grades.
pub fn stars(score: f64, thresholds: &SignalThresholds) -> u8 {
    if score >= thresholds.strong_buy || score <= thresholds.strong_sell {
        5
    } else if score >= thresholds.buy || score <= thresholds.sell {
        4
    } else if score >= 55.0 || score <= 45.0 {
        3
    } else if score >= 52.0 || score <= 48.0 {
        2
    } else {
        1
    }
}
