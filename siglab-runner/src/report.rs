//! Human-readable report rendering.
//!
//! Formats one `Analysis` into the text block the notification collaborator
//! ships (Telegram, console, file — delivery is not this crate's concern).

use siglab_core::domain::Direction;
use siglab_core::Analysis;
use std::fmt::Write;

/// Price formatting with magnitude-scaled precision: big numbers get one
/// decimal, sub-dollar prices get six.
pub fn format_price(price: f64) -> String {
    let decimals = if price >= 1_000.0 {
        1
    } else if price >= 100.0 {
        2
    } else if price >= 10.0 {
        3
    } else if price >= 1.0 {
        4
    } else if price >= 0.1 {
        5
    } else {
        6
    };
    format!("{price:.decimals$}")
}

fn signed_pct(fraction: f64) -> String {
    format!("{:+.2}%", fraction * 100.0)
}

fn trend_word(trend_score: Option<f64>) -> &'static str {
    match trend_score {
        Some(s) if s >= 60.0 => "uptrend",
        Some(s) if s <= 40.0 => "downtrend",
        _ => "range",
    }
}

/// Render the full report.
pub fn format_report(analysis: &Analysis) -> String {
    let mut out = String::new();
    let price = analysis.last_price;

    let _ = writeln!(
        out,
        "=== {} {} analysis [{}] ===",
        analysis.symbol,
        analysis.timeframe,
        trend_word(analysis.categories.trend)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Price: ${}", format_price(price));
    if let Some(change) = analysis.change_pct {
        let _ = writeln!(
            out,
            "{} change: {}",
            analysis.timeframe,
            signed_pct(change)
        );
    }
    if let Some(funding) = analysis.context.funding_rate {
        let side = if funding > 0.0001 {
            "positive, longs pay"
        } else if funding < -0.0001 {
            "negative, shorts pay"
        } else {
            "near zero"
        };
        let _ = writeln!(out, "Funding rate: {:.4}% ({side})", funding * 100.0);
    }
    if let Some(sentiment) = analysis.categories.sentiment {
        let mood = if sentiment >= 70.0 {
            "bullish"
        } else if sentiment <= 30.0 {
            "bearish"
        } else {
            "neutral"
        };
        let _ = writeln!(out, "Sentiment: {mood} (score {sentiment:.1})");
    }

    // Key levels, nearest levels flanking the current price.
    if !analysis.levels.resistance.is_empty() || !analysis.levels.support.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Key levels:");
        for (i, r) in analysis.levels.resistance.iter().enumerate().rev() {
            let kind = if i == 0 { "near" } else { "far" };
            let _ = writeln!(out, "  Resistance ({kind}): ${}", format_price(*r));
        }
        let _ = writeln!(out, "  Current:           ${} <-", format_price(price));
        for (i, s) in analysis.levels.support.iter().enumerate() {
            let kind = if i == 0 { "near" } else { "far" };
            let _ = writeln!(out, "  Support ({kind}):    ${}", format_price(*s));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Technical analysis:");
    technical_lines(&mut out, analysis);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Signal: {} (composite {:.1})",
        analysis.signal, analysis.composite_score
    );
    let filled = "*".repeat(analysis.stars as usize);
    let empty = "-".repeat(5usize.saturating_sub(analysis.stars as usize));
    let _ = writeln!(
        out,
        "Strength: [{filled}{empty}] ({}/5) — {}; {}",
        analysis.stars,
        reliability(analysis.stars),
        timing(analysis.stars)
    );
    if !analysis.degraded.is_empty() {
        let _ = writeln!(
            out,
            "Note: {} indicator(s) still warming up: {}",
            analysis.degraded.len(),
            analysis.degraded.join(", ")
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Trade advice:");
    trade_lines(&mut out, analysis);

    out
}

fn technical_lines(out: &mut String, analysis: &Analysis) {
    let snap = &analysis.snapshot;
    let price = analysis.last_price;

    // MA system: position vs the two slowest defined MAs.
    let mut periods: Vec<usize> = snap.ma.keys().copied().collect();
    periods.sort_unstable();
    if periods.len() >= 2 {
        let short = periods[periods.len() / 2 - 1];
        let long = periods[periods.len() - 1];
        let above_short = price > snap.ma[&short];
        let above_long = price > snap.ma[&long];
        let verdict = match (above_short, above_long) {
            (true, true) => "short- and mid-term trend up",
            (false, false) => "short- and mid-term trend down",
            _ => "trends diverging",
        };
        let _ = writeln!(
            out,
            "  MA system: {} MA{short}, {} MA{long}; {verdict}",
            if above_short { "above" } else { "below" },
            if above_long { "above" } else { "below" },
        );
    }

    if let (Some(upper), Some(middle), Some(lower), Some(width)) =
        (snap.bb_upper, snap.bb_middle, snap.bb_lower, snap.bb_width)
    {
        let position = if price > upper {
            "above upper band, overbought"
        } else if price > middle {
            "above middle band, leaning strong"
        } else if price < lower {
            "below lower band, oversold"
        } else {
            "below middle band, leaning weak"
        };
        let _ = writeln!(
            out,
            "  Bollinger: {position}; width {:.2}%",
            width * 100.0
        );
    }

    if let Some(rsi) = snap.rsi {
        let zone = if rsi > 70.0 {
            "overbought zone, pullback risk"
        } else if rsi > 60.0 {
            "neutral-bullish zone, short-term strength"
        } else if rsi > 40.0 {
            "neutral zone, no clear lean"
        } else if rsi > 30.0 {
            "neutral-bearish zone, short-term weakness"
        } else {
            "oversold zone, bounce possible"
        };
        let _ = writeln!(out, "  RSI({rsi:.1}): {zone}");
    }

    if let (Some(k), Some(d)) = (snap.kdj_k, snap.kdj_d) {
        let cross = if k > d {
            "golden cross, upward momentum"
        } else {
            "dead cross, downward momentum"
        };
        let _ = writeln!(out, "  KDJ: {cross}; K {k:.1} / D {d:.1}");
    }

    if let (Some(hist), Some(prev)) = (snap.macd_hist, snap.macd_hist_prev) {
        let line = if hist > 0.0 {
            if hist > prev {
                "histogram widening, upward momentum building"
            } else {
                "histogram narrowing, upward momentum fading"
            }
        } else if hist < prev {
            "histogram widening, downward momentum building"
        } else {
            "histogram narrowing, downward momentum fading"
        };
        let _ = writeln!(out, "  MACD: {line}");
    }

    if let Some(ratio) = snap.volume_ratio {
        let _ = writeln!(
            out,
            "  Volume: {:.2}x the trailing baseline",
            ratio
        );
    }
}

fn trade_lines(out: &mut String, analysis: &Analysis) {
    let rec = &analysis.recommendation;

    let Some(direction) = rec.signal.direction() else {
        let _ = writeln!(out, "  Direction: stand aside (neutral)");
        return;
    };
    let side = match direction {
        Direction::Long => "long",
        Direction::Short => "short",
    };
    let _ = writeln!(out, "  Direction: {side}");

    if let Some(setup) = rec.setup {
        let _ = writeln!(out, "  Entry: ${}", format_price(setup.entry));
        let _ = writeln!(
            out,
            "  Stop: ${} (-{:.2}%)",
            format_price(setup.stop_loss),
            setup.risk_pct() * 100.0
        );
        let _ = writeln!(
            out,
            "  Target: ${} (+{:.2}%)",
            format_price(setup.target),
            setup.reward_pct() * 100.0
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Risk management:");
    let vol_word = analysis
        .volatility
        .map(|v| v.state.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let leverage_word = if rec.leverage >= 10.0 {
        "high"
    } else if rec.leverage >= 5.0 {
        "medium"
    } else {
        "low"
    };
    let _ = writeln!(
        out,
        "  Suggested leverage: {:.0}x ({leverage_word} leverage, {vol_word} volatility)",
        rec.leverage
    );
    let position_pct = rec.recommended_position_size * 100.0;
    let position_word = if position_pct >= 30.0 {
        "aggressive"
    } else if position_pct >= 10.0 {
        "moderate"
    } else {
        "conservative"
    };
    let _ = writeln!(
        out,
        "  Position size: {position_pct:.1}% of equity ({position_word})"
    );
    if let Some(setup) = rec.setup {
        let _ = writeln!(out, "  Expected return: +{:.2}%", setup.reward_pct() * 100.0);
        let _ = writeln!(out, "  Max drawdown: -{:.2}%", setup.risk_pct() * 100.0);
    }
    if let Some(ratio) = rec.risk_reward_ratio {
        let quality = if ratio >= 3.0 {
            "excellent"
        } else if ratio >= 2.0 {
            "good"
        } else if ratio >= 1.5 {
            "acceptable"
        } else {
            "poor"
        };
        let _ = writeln!(out, "  Risk/reward: {ratio:.2} ({quality})");
    }
    if let Some(vol) = analysis.volatility {
        let _ = writeln!(
            out,
            "  Volatility: {:.1}% annualized ({})",
            vol.current * 100.0,
            vol.state
        );
    }
    if let Some(reason) = rec.rejection_reason {
        let _ = writeln!(out);
        let _ = writeln!(out, "  NOT ACTIONABLE: {reason}");
    }
}

fn reliability(stars: u8) -> &'static str {
    match stars {
        4.. => "high confidence",
        3 => "moderately reliable",
        2 => "weak",
        _ => "for reference only",
    }
}

fn timing(stars: u8) -> &'static str {
    match stars {
        4.. => "entry suggested",
        3 => "worth considering",
        2 => "wait for confirmation",
        _ => "stand aside",
    }
}
