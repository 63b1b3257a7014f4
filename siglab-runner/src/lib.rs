//! SigLab Runner — orchestration around the core engine.
//!
//! Loads and validates TOML configuration, supplies candle data from CSV
//! files or a seeded synthetic generator, fans evaluations out across
//! (symbol, timeframe) pairs with cooperative cancellation, and renders
//! human-readable reports for the notification collaborator.

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod report;

pub use batch::{run_batch, BatchItem, BatchOutcome};
pub use config::{load_config, ConfigFileError, FileConfig};
pub use data_loader::{CsvCandleSource, SyntheticSource};
pub use report::format_report;
