//! Indicator normalizer — maps raw indicator values onto the common
//! [0,100] bullishness scale.
//!
//! Mapping direction is momentum-following throughout: a higher RSI, a
//! golden KDJ cross, a positive MACD histogram, and price above its moving
//! averages all push scores above 50. Every mapping is monotonic in its raw
//! input, clamps to [0,100], and maps the midpoint of its configured bound
//! range to exactly 50, so no single indicator can dominate the composite.
//!
//! Undefined inputs produce `value: None` sub-scores — excluded from
//! category averaging rather than pinned to a neutral 50.

use crate::config::IndicatorParams;
use crate::domain::{CandleSeries, MarketContext};
use crate::indicators::IndicatorSet;
use crate::scoring::{Category, ScoreCard};

pub struct Normalizer;

impl Normalizer {
    pub fn normalize(
        set: &IndicatorSet,
        series: &CandleSeries,
        context: &MarketContext,
        params: &IndicatorParams,
    ) -> ScoreCard {
        let mut card = ScoreCard::default();
        let price = series.last_price();

        Self::trend_scores(&mut card, set, price, params);
        Self::oscillator_scores(&mut card, set, price, params);
        Self::volume_scores(&mut card, set, series, params);
        Self::sentiment_score(&mut card, set, price, context, params);

        card
    }

    // ── Trend ────────────────────────────────────────────────────────────

    fn trend_scores(card: &mut ScoreCard, set: &IndicatorSet, price: f64, params: &IndicatorParams) {
        // Price position vs each moving average: full tilt at +/-10%.
        for &period in &params.ma_periods {
            for kind in ["sma", "ema"] {
                let name = format!("{kind}_{period}");
                let score = set.latest(&name).map(|ma| {
                    if ma == 0.0 {
                        50.0
                    } else {
                        clamp_score(50.0 + (price - ma) / ma * 500.0)
                    }
                });
                card.push(format!("{name}_position"), Category::Trend, score);
            }
        }

        // MA ladder alignment: bullish stack (shorter above longer) → 100,
        // bearish stack → 0, mixed → 50. Needs at least two defined MAs.
        let mut ladder: Vec<(usize, f64)> = params
            .ma_periods
            .iter()
            .filter_map(|&p| set.latest(&format!("sma_{p}")).map(|v| (p, v)))
            .collect();
        ladder.sort_by_key(|&(p, _)| p);
        let alignment = if ladder.len() < 2 {
            None
        } else {
            let bullish = ladder.windows(2).all(|w| w[0].1 > w[1].1);
            let bearish = ladder.windows(2).all(|w| w[0].1 < w[1].1);
            Some(if bullish {
                100.0
            } else if bearish {
                0.0
            } else {
                50.0
            })
        };
        card.push("ma_alignment", Category::Trend, alignment);

        // MACD histogram as a fraction of price: full tilt at +/-2%.
        let macd_score = set.latest("macd_hist").map(|hist| {
            if price == 0.0 {
                50.0
            } else {
                clamp_score(50.0 + hist / price * 2500.0)
            }
        });
        card.push("macd_position", Category::Trend, macd_score);
    }

    // ── Oscillators ──────────────────────────────────────────────────────

    fn oscillator_scores(
        card: &mut ScoreCard,
        set: &IndicatorSet,
        price: f64,
        params: &IndicatorParams,
    ) {
        let rsi_name = format!("rsi_{}", params.rsi.period);
        card.push(
            rsi_name.clone(),
            Category::Oscillators,
            set.latest(&rsi_name)
                .map(|v| band_score(v, params.rsi.oversold, params.rsi.overbought)),
        );

        let k = set.latest("kdj_k");
        let d = set.latest("kdj_d");
        card.push(
            "kdj_k",
            Category::Oscillators,
            k.map(|v| band_score(v, params.kdj.oversold, params.kdj.overbought)),
        );
        card.push(
            "kdj_d",
            Category::Oscillators,
            d.map(|v| band_score(v, params.kdj.oversold, params.kdj.overbought)),
        );

        // Golden/dead cross, graded by the K-D spread: full tilt at 10 points.
        let cross = match (k, d) {
            (Some(k), Some(d)) => Some(50.0 + ((k - d) * 2.5).clamp(-25.0, 25.0)),
            _ => None,
        };
        card.push("kdj_cross", Category::Oscillators, cross);

        // Bollinger %B.
        let pct_b = match (set.latest("bb_upper"), set.latest("bb_lower")) {
            (Some(upper), Some(lower)) => {
                let width = upper - lower;
                Some(if width == 0.0 {
                    50.0
                } else {
                    clamp_score((price - lower) / width * 100.0)
                })
            }
            _ => None,
        };
        card.push("bb_pctb", Category::Oscillators, pct_b);
    }

    // ── Volume ───────────────────────────────────────────────────────────

    fn volume_scores(
        card: &mut ScoreCard,
        set: &IndicatorSet,
        series: &CandleSeries,
        params: &IndicatorParams,
    ) {
        // Above-baseline volume confirms the last price move; fading volume
        // confirms nothing and stays at 50.
        let vol_name = format!("vol_sma_{}", params.volume_period);
        let volume_trend = match (set.latest(&vol_name), series.last_change()) {
            (Some(baseline), Some(change)) if baseline > 0.0 => {
                let ratio = series.last().volume / baseline;
                let push = ((ratio - 1.0) * 50.0).clamp(0.0, 50.0);
                Some(50.0 + change.signum() * push)
            }
            _ => None,
        };
        card.push("volume_trend", Category::Volume, volume_trend);

        // OBV slope over the trailing volume window: full tilt at +/-20%.
        let last_index = series.len() - 1;
        let obv_trend = set.latest("obv").and_then(|latest| {
            let back = last_index.checked_sub(params.volume_period)?;
            let earlier = set.at("obv", back)?;
            if earlier == 0.0 {
                return None;
            }
            let change = (latest - earlier) / earlier.abs();
            Some(clamp_score(50.0 + change * 250.0))
        });
        card.push("obv_trend", Category::Volume, obv_trend);
    }

    // ── Sentiment ────────────────────────────────────────────────────────

    fn sentiment_score(
        card: &mut ScoreCard,
        set: &IndicatorSet,
        price: f64,
        context: &MarketContext,
        params: &IndicatorParams,
    ) {
        let rsi = set.latest(&format!("rsi_{}", params.rsi.period));
        let hist = set.latest("macd_hist");
        let k = set.latest("kdj_k");
        let d = set.latest("kdj_d");

        let mut defined = false;
        let mut score = 50.0;

        if let Some(rsi) = rsi {
            score += (rsi - 50.0) * 0.5;
            defined = true;
        }
        if let Some(hist) = hist {
            if price > 0.0 {
                score += 10.0 * (hist / (0.01 * price)).clamp(-1.0, 1.0);
                defined = true;
            }
        }
        if let (Some(k), Some(d)) = (k, d) {
            score += if k > d { 5.0 } else if k < d { -5.0 } else { 0.0 };
            if k > params.kdj.overbought {
                score += 5.0;
            } else if k < params.kdj.oversold {
                score -= 5.0;
            }
            defined = true;
        }
        if let Some(funding) = context.funding_rate {
            // Positive funding: crowded longs pay, a contrarian bearish tell.
            score -= funding * 1000.0;
            defined = true;
        }

        card.push(
            "sentiment",
            Category::Sentiment,
            defined.then(|| clamp_score(score)),
        );
    }
}

/// Piecewise-linear oscillator mapping through the configured bounds:
/// (0 → 0), (oversold → 25), (midpoint → 50), (overbought → 75), (100 → 100).
fn band_score(value: f64, oversold: f64, overbought: f64) -> f64 {
    let mid = (oversold + overbought) / 2.0;
    let score = if value <= oversold {
        segment(value, 0.0, 0.0, oversold, 25.0)
    } else if value <= mid {
        segment(value, oversold, 25.0, mid, 50.0)
    } else if value <= overbought {
        segment(value, mid, 50.0, overbought, 75.0)
    } else {
        segment(value, overbought, 75.0, 100.0, 100.0)
    };
    clamp_score(score)
}

/// Linear interpolation over one segment; degenerate segments snap to y1.
fn segment(value: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if x1 <= x0 {
        return y1;
    }
    y0 + (value - x0) / (x1 - x0) * (y1 - y0)
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
