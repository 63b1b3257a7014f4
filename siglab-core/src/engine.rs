//! Indicator engine — computes every configured indicator over one window.
//!
//! The engine is a pure function of the candle window and the indicator
//! parameters. Series are computed once per evaluation and queried by the
//! scoring stages; nothing is recomputed per stage.

use crate::config::IndicatorParams;
use crate::domain::CandleSeries;
use crate::indicators::{
    Atr, Bollinger, Ema, Indicator, IndicatorSet, Kdj, Macd, Obv, Rsi, Sma, VolumeSma,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Build the configured indicator instances.
    pub fn instances(params: &IndicatorParams) -> Vec<Box<dyn Indicator>> {
        let mut out: Vec<Box<dyn Indicator>> = Vec::new();
        for &period in &params.ma_periods {
            out.push(Box::new(Sma::new(period)));
            out.push(Box::new(Ema::new(period)));
        }
        out.push(Box::new(Rsi::new(params.rsi.period)));
        let kdj = &params.kdj;
        out.push(Box::new(Kdj::k(kdj.k_period, kdj.d_period, kdj.j_period)));
        out.push(Box::new(Kdj::d(kdj.k_period, kdj.d_period, kdj.j_period)));
        out.push(Box::new(Kdj::j(kdj.k_period, kdj.d_period, kdj.j_period)));
        let macd = &params.macd;
        out.push(Box::new(Macd::line(
            macd.fast_period,
            macd.slow_period,
            macd.signal_period,
        )));
        out.push(Box::new(Macd::signal(
            macd.fast_period,
            macd.slow_period,
            macd.signal_period,
        )));
        out.push(Box::new(Macd::histogram(
            macd.fast_period,
            macd.slow_period,
            macd.signal_period,
        )));
        let boll = &params.bollinger;
        out.push(Box::new(Bollinger::upper(boll.period, boll.std_dev)));
        out.push(Box::new(Bollinger::middle(boll.period, boll.std_dev)));
        out.push(Box::new(Bollinger::lower(boll.period, boll.std_dev)));
        out.push(Box::new(Atr::new(params.atr_period)));
        out.push(Box::new(Obv::new()));
        out.push(Box::new(VolumeSma::new(params.volume_period)));
        out
    }

    /// Compute every configured indicator for the window.
    pub fn compute(series: &CandleSeries, params: &IndicatorParams) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        for indicator in Self::instances(params) {
            set.insert(indicator.name().to_string(), indicator.compute(series.candles()));
        }
        set
    }
}

/// Latest defined indicator values for one evaluation, by field.
///
/// This is the view the report and persistence collaborators consume; the
/// scoring stages read the raw `IndicatorSet` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Close of the most recent candle.
    pub price: f64,
    /// Latest SMA value per configured period.
    pub ma: BTreeMap<usize, f64>,
    /// Latest EMA value per configured period.
    pub ema: BTreeMap<usize, f64>,
    pub rsi: Option<f64>,
    pub kdj_k: Option<f64>,
    pub kdj_d: Option<f64>,
    pub kdj_j: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    /// Previous candle's histogram, for momentum direction.
    pub macd_hist_prev: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    /// (upper - lower) / middle.
    pub bb_width: Option<f64>,
    pub atr: Option<f64>,
    pub obv: Option<f64>,
    /// Relative OBV change over the trailing volume window.
    pub obv_change: Option<f64>,
    /// Last candle volume over the trailing volume baseline.
    pub volume_ratio: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn from_set(
        set: &IndicatorSet,
        series: &CandleSeries,
        params: &IndicatorParams,
    ) -> Self {
        let rsi_name = format!("rsi_{}", params.rsi.period);
        let atr_name = format!("atr_{}", params.atr_period);
        let vol_name = format!("vol_sma_{}", params.volume_period);
        let last_index = series.len() - 1;

        let mut ma = BTreeMap::new();
        let mut ema = BTreeMap::new();
        for &period in &params.ma_periods {
            if let Some(v) = set.latest(&format!("sma_{period}")) {
                ma.insert(period, v);
            }
            if let Some(v) = set.latest(&format!("ema_{period}")) {
                ema.insert(period, v);
            }
        }

        let bb_upper = set.latest("bb_upper");
        let bb_middle = set.latest("bb_middle");
        let bb_lower = set.latest("bb_lower");
        let bb_width = match (bb_upper, bb_middle, bb_lower) {
            (Some(u), Some(m), Some(l)) if m != 0.0 => Some((u - l) / m),
            _ => None,
        };

        let obv = set.latest("obv");
        let obv_change = obv.and_then(|latest| {
            let back = last_index.checked_sub(params.volume_period)?;
            let earlier = set.at("obv", back)?;
            if earlier == 0.0 {
                return None;
            }
            Some((latest - earlier) / earlier.abs())
        });

        let volume_ratio = set.latest(&vol_name).and_then(|baseline| {
            if baseline == 0.0 {
                return None;
            }
            Some(series.last().volume / baseline)
        });

        Self {
            price: series.last_price(),
            ma,
            ema,
            rsi: set.latest(&rsi_name),
            kdj_k: set.latest("kdj_k"),
            kdj_d: set.latest("kdj_d"),
            kdj_j: set.latest("kdj_j"),
            macd: set.latest("macd"),
            macd_signal: set.latest("macd_signal"),
            macd_hist: set.latest("macd_hist"),
            macd_hist_prev: last_index
                .checked_sub(1)
                .and_then(|i| set.at("macd_hist", i)),
            bb_upper,
            bb_middle,
            bb_lower,
            bb_width,
            atr: set.latest(&atr_name),
            obv,
            obv_change,
            volume_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timeframe;
    use crate::indicators::make_candles;

    fn series(closes: &[f64]) -> CandleSeries {
        CandleSeries::new("BTC/USDT", Timeframe::H1, make_candles(closes)).unwrap()
    }

    fn small_params() -> IndicatorParams {
        IndicatorParams {
            ma_periods: vec![3, 5],
            ..IndicatorParams::default()
        }
    }

    #[test]
    fn engine_computes_all_configured_series() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0)
            .collect();
        let set = IndicatorEngine::compute(&series(&closes), &small_params());
        // 2 MA periods x (sma + ema) + rsi + 3 kdj + 3 macd + 3 bb + atr + obv + vol_sma
        assert_eq!(set.len(), 17);
        assert!(set.latest("sma_3").is_some());
        assert!(set.latest("macd_hist").is_some());
        assert!(set.latest("kdj_j").is_some());
    }

    #[test]
    fn short_window_leaves_long_indicators_undefined() {
        let set = IndicatorEngine::compute(&series(&[100.0, 101.0, 102.0, 103.0]), &small_params());
        assert!(set.latest("sma_3").is_some());
        assert!(set.latest("sma_5").is_none());
        assert!(set.latest("rsi_14").is_none());
        let undefined = set.undefined_names();
        assert!(undefined.contains(&"rsi_14".to_string()));
        assert!(undefined.contains(&"macd".to_string()));
    }

    #[test]
    fn snapshot_carries_latest_values() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0)
            .collect();
        let s = series(&closes);
        let params = small_params();
        let set = IndicatorEngine::compute(&s, &params);
        let snap = IndicatorSnapshot::from_set(&set, &s, &params);

        assert_eq!(snap.price, s.last_price());
        assert!(snap.ma.contains_key(&3));
        assert!(snap.rsi.is_some());
        assert!(snap.bb_width.is_some());
        assert!(snap.volume_ratio.is_some());
        assert!(snap.macd_hist_prev.is_some());
    }

    #[test]
    fn snapshot_omits_undefined_mas() {
        let s = series(&[100.0, 101.0, 102.0, 103.0]);
        let params = small_params();
        let set = IndicatorEngine::compute(&s, &params);
        let snap = IndicatorSnapshot::from_set(&set, &s, &params);
        assert!(snap.ma.contains_key(&3));
        assert!(!snap.ma.contains_key(&5));
        assert_eq!(snap.rsi, None);
    }
}
