//! Property tests for scoring and risk invariants.
//!
//! Uses proptest to verify:
//! 1. Composite bounds — any defined category scores and valid weights give
//!    a composite in [0,100]
//! 2. Classifier totality — every score maps to exactly one label and the
//!    mapping is a pure function of the score
//! 3. Monotonicity — raising one sub-score never lowers the composite
//! 4. Risk ceilings — position size and leverage never exceed the configured
//!    caps, for any signal strength or account context
//! 5. Idempotence — the same candle window always produces the same output

use proptest::prelude::*;
use siglab_core::classify::classify;
use siglab_core::config::{AnalysisConfig, CategoryWeights, RiskParameters, SignalThresholds};
use siglab_core::domain::{
    AccountContext, CandleSeries, MarketContext, Signal, Timeframe, TradeSetup,
};
use siglab_core::risk::RiskEvaluator;
use siglab_core::scoring::{composite, Category, CategoryScores, ScoreCard};
use siglab_core::Analyzer;
use chrono::{Duration, TimeZone, Utc};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_score() -> impl Strategy<Value = f64> {
    0.0..=100.0_f64
}

fn arb_opt_score() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(arb_score())
}

/// Four non-negative weights normalized to sum exactly 1.0.
fn arb_weights() -> impl Strategy<Value = CategoryWeights> {
    (0.01..1.0_f64, 0.01..1.0_f64, 0.01..1.0_f64, 0.01..1.0_f64).prop_map(|(a, b, c, d)| {
        let sum = a + b + c + d;
        CategoryWeights {
            trend: a / sum,
            oscillators: b / sum,
            volume: c / sum,
            sentiment: d / sum,
        }
    })
}

fn arb_category_scores() -> impl Strategy<Value = CategoryScores> {
    (arb_opt_score(), arb_opt_score(), arb_opt_score(), arb_opt_score()).prop_map(
        |(trend, oscillators, volume, sentiment)| CategoryScores {
            trend,
            oscillators,
            volume,
            sentiment,
        },
    )
}

/// Random-walk candle series of the given length.
fn candle_series(len: usize, seed_returns: &[i8]) -> CandleSeries {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut close = 100.0;
    let candles = (0..len)
        .map(|i| {
            let step = seed_returns[i % seed_returns.len()] as f64 * 0.2;
            let open = close;
            close = (close + step).max(1.0);
            siglab_core::domain::Candle {
                timestamp: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1_000.0 + (i % 7) as f64 * 100.0,
            }
        })
        .collect();
    CandleSeries::new("BTC/USDT", Timeframe::H1, candles).unwrap()
}

// ── 1. Composite bounds ──────────────────────────────────────────────

proptest! {
    #[test]
    fn composite_stays_in_bounds(
        scores in arb_category_scores(),
        weights in arb_weights(),
    ) {
        if let Some(c) = composite(&scores, &weights) {
            prop_assert!((0.0..=100.0).contains(&c), "composite out of bounds: {c}");
        } else {
            // None only when nothing was defined
            prop_assert!(scores.all_undefined());
        }
    }

    /// With every category defined, the composite is the plain weighted sum.
    #[test]
    fn composite_matches_weighted_sum_when_all_defined(
        t in arb_score(),
        o in arb_score(),
        v in arb_score(),
        s in arb_score(),
        weights in arb_weights(),
    ) {
        let scores = CategoryScores {
            trend: Some(t),
            oscillators: Some(o),
            volume: Some(v),
            sentiment: Some(s),
        };
        let expected = weights.trend * t
            + weights.oscillators * o
            + weights.volume * v
            + weights.sentiment * s;
        let got = composite(&scores, &weights).unwrap();
        prop_assert!((got - expected).abs() < 1e-9);
    }
}

// ── 2. Classifier totality and purity ────────────────────────────────

proptest! {
    #[test]
    fn classifier_is_pure_and_total(score in arb_score()) {
        let thresholds = SignalThresholds::default();
        let first = classify(score, &thresholds);
        let second = classify(score, &thresholds);
        prop_assert_eq!(first, second);
    }

    /// Band edges are closed below, open above: classify at the cut point
    /// gives the band owning that cut, a hair below gives the band beneath.
    #[test]
    fn classifier_band_edges(epsilon in 1e-9..0.01_f64) {
        let t = SignalThresholds::default();
        prop_assert_eq!(classify(t.strong_buy, &t), Signal::StrongBuy);
        prop_assert_eq!(classify(t.strong_buy - epsilon, &t), Signal::Buy);
        prop_assert_eq!(classify(t.buy, &t), Signal::Buy);
        prop_assert_eq!(classify(t.buy - epsilon, &t), Signal::Neutral);
        prop_assert_eq!(classify(t.neutral, &t), Signal::Neutral);
        prop_assert_eq!(classify(t.neutral - epsilon, &t), Signal::Sell);
        prop_assert_eq!(classify(t.sell, &t), Signal::Sell);
        prop_assert_eq!(classify(t.sell - epsilon, &t), Signal::StrongSell);
    }
}

// ── 3. Monotonicity ──────────────────────────────────────────────────

proptest! {
    /// Raising any single sub-score (others fixed) never lowers the composite.
    #[test]
    fn composite_is_monotone_in_each_subscore(
        base in arb_score(),
        bump in 0.0..50.0_f64,
        others in prop::collection::vec((0usize..4, arb_score()), 0..8),
        weights in arb_weights(),
    ) {
        let categories = [
            Category::Trend,
            Category::Oscillators,
            Category::Volume,
            Category::Sentiment,
        ];

        let build = |value: f64| {
            let mut card = ScoreCard::default();
            card.push("probe", Category::Trend, Some(value));
            for (i, (cat, score)) in others.iter().enumerate() {
                card.push(format!("other_{i}"), categories[*cat], Some(*score));
            }
            composite(&CategoryScores::aggregate(&card), &weights).unwrap()
        };

        let low = build(base);
        let high = build((base + bump).min(100.0));
        prop_assert!(high >= low - 1e-9, "composite decreased: {low} -> {high}");
    }
}

// ── 4. Risk ceilings ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn risk_ceilings_hold(
        score in arb_score(),
        max_position in 0.05..1.0_f64,
        max_leverage in 1.0..50.0_f64,
        volatility in prop::option::of(0.01..3.0_f64),
        stop_pct in 0.001..0.2_f64,
        reward_mult in 0.1..10.0_f64,
    ) {
        let risk = RiskParameters {
            max_position_size: max_position,
            max_leverage,
            min_risk_reward: 1.5,
        };
        let entry = 100.0;
        let setup = TradeSetup {
            entry,
            stop_loss: entry * (1.0 - stop_pct),
            target: entry * (1.0 + stop_pct * reward_mult),
        };
        let account = AccountContext { setup: Some(setup), volatility };

        for signal in [Signal::StrongBuy, Signal::Buy, Signal::Neutral, Signal::Sell, Signal::StrongSell] {
            let rec = RiskEvaluator::evaluate(
                "BTC/USDT",
                Timeframe::H4,
                signal,
                score,
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                &account,
                &risk,
            );
            prop_assert!(rec.recommended_position_size <= max_position + 1e-12);
            prop_assert!(rec.recommended_position_size >= 0.0);
            prop_assert!(rec.leverage <= max_leverage + 1e-12);
            if signal == Signal::Neutral {
                prop_assert!(!rec.accepted);
            }
            if rec.accepted {
                prop_assert!(rec.risk_reward_ratio.unwrap() >= risk.min_risk_reward);
            }
        }
    }
}

// ── 5. Idempotence ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn analyze_is_deterministic(
        seed_returns in prop::collection::vec(-3i8..=3, 8..24),
        len in 60usize..200,
    ) {
        let mut config = AnalysisConfig::default();
        config.indicators.ma_periods = vec![5, 10, 20];
        let analyzer = Analyzer::new(config).unwrap();
        let series = candle_series(len, &seed_returns);

        let a = analyzer.analyze_series(&series, &MarketContext::default()).unwrap();
        let b = analyzer.analyze_series(&series, &MarketContext::default()).unwrap();
        prop_assert_eq!(&a, &b);

        // Bit-identical through serialization as well.
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        prop_assert_eq!(ja, jb);
    }
}
