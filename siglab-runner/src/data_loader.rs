//! Candle sources: CSV files on disk and a seeded synthetic generator.
//!
//! The CSV layout is one file per (symbol, timeframe) pair:
//! `<dir>/<SYMBOL>_<timeframe>.csv` with the symbol's `/` flattened to `-`
//! (e.g. `BTC-USDT_1h.csv`) and a `timestamp,open,high,low,close,volume`
//! header. Timestamps are unix epoch, seconds or milliseconds.

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use siglab_core::data::{CandleSource, SourceError};
use siglab_core::domain::{Candle, CandleSeries, Timeframe};
use std::path::PathBuf;
use tracing::debug;

/// CSV-backed candle source.
#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl CsvCandleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        let flat = symbol.replace('/', "-");
        self.dir.join(format!("{flat}_{timeframe}.csv"))
    }
}

/// Epoch seconds or milliseconds, distinguished by magnitude.
fn parse_timestamp(raw: i64) -> Option<DateTime<Utc>> {
    if raw.abs() > 1_000_000_000_000 {
        Utc.timestamp_millis_opt(raw).single()
    } else {
        Utc.timestamp_opt(raw, 0).single()
    }
}

impl CandleSource for CsvCandleSource {
    fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<CandleSeries, SourceError> {
        let path = self.file_path(symbol, timeframe);
        if !path.exists() {
            return Err(SourceError::NotFound {
                symbol: symbol.to_string(),
                timeframe,
            });
        }
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| SourceError::Io(format!("{}: {e}", path.display())))?;

        let mut candles = Vec::new();
        for row in reader.deserialize() {
            let row: CsvRow =
                row.map_err(|e| SourceError::Io(format!("{}: {e}", path.display())))?;
            let timestamp = parse_timestamp(row.timestamp).ok_or_else(|| {
                SourceError::Io(format!(
                    "{}: invalid timestamp {}",
                    path.display(),
                    row.timestamp
                ))
            })?;
            candles.push(Candle {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        debug!(%symbol, %timeframe, rows = candles.len(), "loaded CSV candles");

        let start = candles.len().saturating_sub(lookback);
        Ok(CandleSeries::new(symbol, timeframe, candles.split_off(start))?)
    }
}

/// Seeded random-walk candle generator.
///
/// Deterministic per (seed, symbol, timeframe), so repeated runs — and
/// tests — see identical data. Useful offline and as a smoke-test source.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn stream_seed(&self, symbol: &str, timeframe: Timeframe) -> u64 {
        // FNV-1a over the stream identity, folded into the user seed.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in symbol.bytes().chain(timeframe.as_str().bytes()) {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash ^ self.seed
    }
}

impl CandleSource for SyntheticSource {
    fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<CandleSeries, SourceError> {
        let mut rng = StdRng::seed_from_u64(self.stream_seed(symbol, timeframe));
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let step = chrono::Duration::minutes(timeframe.minutes() as i64);

        let mut close: f64 = 100.0 * rng.gen_range(0.5..20.0);
        let drift = rng.gen_range(-0.001..0.001);
        let vol = rng.gen_range(0.002..0.02);

        let candles: Vec<Candle> = (0..lookback.max(1))
            .map(|i| {
                let open = close;
                let ret = drift + rng.gen_range(-vol..vol);
                close = (open * (1.0 + ret)).max(0.01);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..vol / 2.0));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..vol / 2.0));
                Candle {
                    timestamp: base + step * i as i32,
                    open,
                    high,
                    low,
                    close,
                    volume: 1_000.0 * (1.0 + rng.gen_range(0.0..2.0)),
                }
            })
            .collect();

        Ok(CandleSeries::new(symbol, timeframe, candles)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &std::path::Path, name: &str, rows: &[(i64, f64)]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        for (ts, close) in rows {
            writeln!(
                file,
                "{ts},{o},{h},{l},{close},1000",
                o = close - 0.5,
                h = close + 1.0,
                l = close - 1.0,
            )
            .unwrap();
        }
    }

    #[test]
    fn csv_source_reads_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<(i64, f64)> = (0..10)
            .map(|i| (1_700_000_000 + i * 3600, 100.0 + i as f64))
            .collect();
        write_csv(dir.path(), "BTC-USDT_1h.csv", &rows);

        let source = CsvCandleSource::new(dir.path());
        let series = source.candles("BTC/USDT", Timeframe::H1, 4).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.last_price(), 109.0);
    }

    #[test]
    fn csv_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvCandleSource::new(dir.path());
        let err = source.candles("BTC/USDT", Timeframe::H1, 10).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn csv_source_accepts_millisecond_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<(i64, f64)> = (0..3)
            .map(|i| ((1_700_000_000 + i * 3600) * 1000, 100.0 + i as f64))
            .collect();
        write_csv(dir.path(), "ETH-USDT_4h.csv", &rows);

        let source = CsvCandleSource::new(dir.path());
        let series = source.candles("ETH/USDT", Timeframe::H4, 10).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.candles()[0].timestamp,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap()
        );
    }

    #[test]
    fn csv_source_rejects_unsorted_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "BTC-USDT_1h.csv",
            &[(1_700_007_200, 101.0), (1_700_000_000, 100.0)],
        );
        let source = CsvCandleSource::new(dir.path());
        let err = source.candles("BTC/USDT", Timeframe::H1, 10).unwrap_err();
        assert!(matches!(err, SourceError::Invalid(_)));
    }

    #[test]
    fn synthetic_source_is_deterministic() {
        let source = SyntheticSource::new(42);
        let a = source.candles("BTC/USDT", Timeframe::H1, 100).unwrap();
        let b = source.candles("BTC/USDT", Timeframe::H1, 100).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 100);
    }

    #[test]
    fn synthetic_streams_differ_by_identity() {
        let source = SyntheticSource::new(42);
        let btc = source.candles("BTC/USDT", Timeframe::H1, 50).unwrap();
        let eth = source.candles("ETH/USDT", Timeframe::H1, 50).unwrap();
        assert_ne!(btc.last_price(), eth.last_price());
    }

    #[test]
    fn synthetic_candles_are_sane() {
        let source = SyntheticSource::new(7);
        let series = source.candles("SOL/USDT", Timeframe::H4, 200).unwrap();
        for candle in series.candles() {
            assert!(candle.is_sane(), "insane candle: {candle:?}");
        }
    }
}
