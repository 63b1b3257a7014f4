//! Domain types for the signal engine.

pub mod candle;
pub mod context;
pub mod recommendation;
pub mod signal;

pub use candle::{Candle, CandleError, CandleSeries, Timeframe};
pub use context::{AccountContext, MarketContext};
pub use recommendation::{RejectReason, TradeRecommendation, TradeSetup};
pub use signal::{Direction, Signal};

/// Symbol type alias
pub type Symbol = String;
