//! Trade planner — derives a stop/target context from market structure.
//!
//! The stop prefers the nearest support (long) or resistance (short) level,
//! pushed out to a 2% minimum so noise cannot tag it, with a 2x ATR fallback
//! when no level exists. The target is the lesser of a 2:1 projection from
//! the stop distance and the nearest opposing level. The planner's output is
//! one possible account context; the risk evaluator accepts any.

use crate::domain::{Candle, Direction, TradeSetup};
use crate::levels::KeyLevels;

/// Minimum stop distance as a fraction of entry.
const MIN_STOP_PCT: f64 = 0.02;
/// Reward projected per unit of risk when no level caps the target.
const TARGET_RISK_MULTIPLE: f64 = 2.0;
/// ATR multiple for the fallback stop.
const ATR_STOP_MULTIPLE: f64 = 2.0;

/// Plan entry, stop, and target for a directional trade off the last close.
pub fn plan(
    direction: Direction,
    last_candle: &Candle,
    levels: &KeyLevels,
    atr: Option<f64>,
) -> TradeSetup {
    let entry = last_candle.close;
    // Without ATR, fall back to 1% of price as the unit of noise.
    let atr = atr.unwrap_or(entry * 0.01);

    match direction {
        Direction::Long => {
            let stop_loss = match levels.nearest_support(entry) {
                Some(support) if (entry - support) / entry >= MIN_STOP_PCT / 2.0 => support,
                Some(_) => entry * (1.0 - MIN_STOP_PCT),
                None => entry - ATR_STOP_MULTIPLE * atr,
            };
            let projected = entry + TARGET_RISK_MULTIPLE * (entry - stop_loss);
            let target = match levels.nearest_resistance(entry) {
                Some(resistance) => projected.min(resistance),
                None => projected,
            };
            TradeSetup {
                entry,
                stop_loss,
                target,
            }
        }
        Direction::Short => {
            let stop_loss = match levels.nearest_resistance(entry) {
                Some(resistance) if (resistance - entry) / entry >= MIN_STOP_PCT / 2.0 => resistance,
                Some(_) => entry * (1.0 + MIN_STOP_PCT),
                None => entry + ATR_STOP_MULTIPLE * atr,
            };
            let projected = entry - TARGET_RISK_MULTIPLE * (stop_loss - entry);
            let target = match levels.nearest_support(entry) {
                Some(support) => projected.max(support),
                None => projected,
            };
            TradeSetup {
                entry,
                stop_loss,
                target,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_candles;

    fn last_candle(close: f64) -> Candle {
        make_candles(&[close]).pop().unwrap()
    }

    #[test]
    fn long_stop_uses_nearest_support() {
        let levels = KeyLevels {
            support: vec![96.0, 90.0],
            resistance: vec![110.0],
        };
        let setup = plan(Direction::Long, &last_candle(100.0), &levels, Some(1.5));
        assert_eq!(setup.entry, 100.0);
        assert_eq!(setup.stop_loss, 96.0);
        // projected = 100 + 2*4 = 108, capped by nothing below resistance 110
        assert_eq!(setup.target, 108.0);
        assert_eq!(setup.direction(), Direction::Long);
    }

    #[test]
    fn long_target_capped_by_resistance() {
        let levels = KeyLevels {
            support: vec![95.0],
            resistance: vec![104.0],
        };
        let setup = plan(Direction::Long, &last_candle(100.0), &levels, Some(1.5));
        // projected 110 capped to the nearer resistance
        assert_eq!(setup.target, 104.0);
    }

    #[test]
    fn long_stop_too_close_pushed_to_minimum() {
        let levels = KeyLevels {
            support: vec![99.5],
            resistance: vec![],
        };
        let setup = plan(Direction::Long, &last_candle(100.0), &levels, Some(1.5));
        assert_eq!(setup.stop_loss, 98.0); // 2% minimum
    }

    #[test]
    fn long_without_levels_uses_atr() {
        let setup = plan(
            Direction::Long,
            &last_candle(100.0),
            &KeyLevels::default(),
            Some(1.5),
        );
        assert_eq!(setup.stop_loss, 97.0); // entry - 2 * ATR
        assert_eq!(setup.target, 106.0);
    }

    #[test]
    fn short_is_symmetric() {
        let levels = KeyLevels {
            support: vec![92.0],
            resistance: vec![103.0],
        };
        let setup = plan(Direction::Short, &last_candle(100.0), &levels, Some(1.5));
        assert_eq!(setup.stop_loss, 103.0);
        // projected = 100 - 2*3 = 94, floored by support 92 → 94
        assert_eq!(setup.target, 94.0);
        assert_eq!(setup.direction(), Direction::Short);
    }

    #[test]
    fn planned_setups_have_positive_risk() {
        for direction in [Direction::Long, Direction::Short] {
            let setup = plan(
                direction,
                &last_candle(100.0),
                &KeyLevels::default(),
                None,
            );
            assert!(setup.risk_pct() > 0.0);
            assert!(setup.risk_reward().is_some());
        }
    }
}
