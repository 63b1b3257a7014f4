//! Per-evaluation context supplied by external collaborators.

use crate::domain::TradeSetup;
use serde::{Deserialize, Serialize};

/// Market-wide context not derivable from the candle window.
///
/// Supplied by the data collaborator alongside the candles; every field is
/// optional and absent fields simply contribute nothing to scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Current funding rate of the perpetual contract, as a fraction.
    /// Positive means longs pay shorts.
    pub funding_rate: Option<f64>,
}

/// Account-side context for the risk gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountContext {
    /// Stop/target context for the proposed trade. Without one, a
    /// directional signal cannot pass the risk/reward check.
    pub setup: Option<TradeSetup>,
    /// Annualized volatility of the market, when known. Bounds the
    /// suggested leverage.
    pub volatility: Option<f64>,
}

impl AccountContext {
    pub fn with_setup(setup: TradeSetup) -> Self {
        Self {
            setup: Some(setup),
            volatility: None,
        }
    }
}
