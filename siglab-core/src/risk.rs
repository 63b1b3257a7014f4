//! Risk evaluator — gates and sizes a classified signal.
//!
//! A pure function from (signal, score, account context, risk parameters) to
//! a recommendation. It never places orders; rejection is an ordinary output
//! value. Position size and leverage are hard-capped by the configured
//! ceilings regardless of signal strength.

use crate::config::RiskParameters;
use crate::domain::{
    AccountContext, RejectReason, Signal, Timeframe, TradeRecommendation,
};
use chrono::{DateTime, Utc};

/// Annualized-volatility bands for the leverage base, loosest first.
/// Calm markets tolerate more leverage; a violent one gets 3x at most.
const LEVERAGE_BANDS: [(f64, f64); 2] = [(0.5, 10.0), (1.0, 5.0)];
const LEVERAGE_FLOOR_BASE: f64 = 3.0;

pub struct RiskEvaluator;

impl RiskEvaluator {
    pub fn evaluate(
        symbol: &str,
        timeframe: Timeframe,
        signal: Signal,
        composite_score: f64,
        evaluated_at: DateTime<Utc>,
        account: &AccountContext,
        risk: &RiskParameters,
    ) -> TradeRecommendation {
        let reject = |reason: RejectReason,
                      position: f64,
                      leverage: f64,
                      ratio: Option<f64>| TradeRecommendation {
            symbol: symbol.to_string(),
            timeframe,
            signal,
            composite_score,
            recommended_position_size: position,
            leverage,
            risk_reward_ratio: ratio,
            setup: account.setup,
            accepted: false,
            rejection_reason: Some(reason),
            evaluated_at,
        };

        // 1. Neutral is never actionable.
        if signal == Signal::Neutral {
            return reject(RejectReason::NeutralSignal, 0.0, 1.0, None);
        }

        // 2. Size proportional to the score's distance from the midpoint,
        //    capped at the configured ceiling.
        let strength = ((composite_score - 50.0).abs() / 50.0).clamp(0.0, 1.0);
        let position = (strength * risk.max_position_size).min(risk.max_position_size);

        // 3. Leverage from the volatility band, tempered by stop distance,
        //    capped at the configured ceiling.
        let leverage = Self::suggest_leverage(account, risk);

        // 4. Risk/reward gate from the account-supplied stop/target context.
        let Some(setup) = account.setup else {
            return reject(RejectReason::NoTradeSetup, position, leverage, None);
        };
        let ratio = setup.risk_reward();
        match ratio {
            Some(r) if r >= risk.min_risk_reward => {}
            // Undefined ratio (stop on the entry) cannot clear the minimum.
            _ => return reject(RejectReason::RiskRewardBelowMinimum, position, leverage, ratio),
        }

        // 5. Accepted.
        TradeRecommendation {
            symbol: symbol.to_string(),
            timeframe,
            signal,
            composite_score,
            recommended_position_size: position,
            leverage,
            risk_reward_ratio: ratio,
            setup: Some(setup),
            accepted: true,
            rejection_reason: None,
            evaluated_at,
        }
    }

    fn suggest_leverage(account: &AccountContext, risk: &RiskParameters) -> f64 {
        let base = match account.volatility {
            Some(vol) => LEVERAGE_BANDS
                .iter()
                .find(|&&(bound, _)| vol < bound)
                .map(|&(_, leverage)| leverage)
                .unwrap_or(LEVERAGE_FLOOR_BASE),
            None => 5.0,
        };
        // Wide stops cut leverage so a full stop-out stays near half the margin.
        let tempered = match account.setup.map(|s| s.risk_pct()) {
            Some(risk_pct) if risk_pct > 0.0 => base.min(0.5 / risk_pct),
            _ => base,
        };
        tempered.clamp(1.0, risk.max_leverage)
    }
}
