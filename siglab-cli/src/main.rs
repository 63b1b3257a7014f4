//! SigLab CLI — run the analysis pipeline from the command line.
//!
//! Commands:
//! - `analyze` — evaluate the configured (or overridden) symbols and
//!   timeframes and print a report per market
//! - `check-config` — validate a config file and print its fingerprint

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use siglab_core::data::CandleSource;
use siglab_core::domain::Timeframe;
use siglab_core::Analyzer;
use siglab_runner::batch::{items_for, run_batch};
use siglab_runner::{format_report, load_config, CsvCandleSource, FileConfig, SyntheticSource};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "siglab",
    about = "SigLab CLI — indicator fusion, signal classification, risk-gated recommendations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate symbols/timeframes and print a report per market.
    Analyze {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Evaluate only this symbol (e.g. BTC/USDT).
        #[arg(short, long)]
        symbol: Option<String>,

        /// Evaluate only this timeframe (e.g. 1h, 4h, 1d).
        #[arg(short, long)]
        timeframe: Option<String>,

        /// Directory of <SYMBOL>_<timeframe>.csv candle files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Use seeded synthetic candles instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic source.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Emit recommendations as JSON instead of text reports.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Validate a config file and print its fingerprint.
    CheckConfig {
        /// Path to a TOML config file.
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Analyze {
            config,
            symbol,
            timeframe,
            data_dir,
            synthetic,
            seed,
            json,
        } => analyze(config, symbol, timeframe, data_dir, synthetic, seed, json),
        Commands::CheckConfig { config } => check_config(config),
    }
}

#[allow(clippy::too_many_arguments)]
fn analyze(
    config_path: Option<PathBuf>,
    symbol: Option<String>,
    timeframe: Option<String>,
    data_dir: PathBuf,
    synthetic: bool,
    seed: u64,
    json: bool,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => FileConfig::default(),
    };

    let symbols: Vec<String> = match symbol {
        Some(s) => vec![s],
        None => config.batch.symbols.clone(),
    };
    let timeframes: Vec<Timeframe> = match timeframe {
        Some(tf) => vec![tf.parse::<Timeframe>().context("parsing --timeframe")?],
        None => config.batch.timeframes.clone(),
    };

    let analyzer = Analyzer::new(config.to_analysis_config())?;
    info!(fingerprint = analyzer.fingerprint(), "configuration validated");

    let source: Box<dyn CandleSource> = if synthetic {
        Box::new(SyntheticSource::new(seed))
    } else {
        Box::new(CsvCandleSource::new(data_dir))
    };

    let items = items_for(&symbols, &timeframes);
    let outcomes = run_batch(&analyzer, source.as_ref(), &items, config.batch.threads, None);

    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(analysis) => {
                if json {
                    println!("{}", serde_json::to_string(&analysis.recommendation)?);
                } else {
                    println!("{}", format_report(analysis));
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{} {}: {err}", outcome.symbol, outcome.timeframe);
            }
        }
    }

    if failures == outcomes.len() && !outcomes.is_empty() {
        bail!("every evaluation failed ({failures}/{})", outcomes.len());
    }
    Ok(())
}

fn check_config(path: PathBuf) -> Result<()> {
    let config = load_config(&path).with_context(|| format!("loading {}", path.display()))?;
    let analyzer = Analyzer::new(config.to_analysis_config())?;
    println!("config OK");
    println!("fingerprint: {}", analyzer.fingerprint());
    println!(
        "symbols: {} | timeframes: {} | max lookback: {} bars",
        config.batch.symbols.join(", "),
        config
            .batch
            .timeframes
            .iter()
            .map(|tf| tf.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        config.max_lookback_bars
    );
    Ok(())
}
