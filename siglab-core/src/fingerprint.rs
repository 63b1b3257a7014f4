//! Content-addressable configuration fingerprint.
//!
//! Two analyses stamped with the same fingerprint ran under an identical
//! configuration, which together with the candle window pins down the
//! entire output.

use crate::config::AnalysisConfig;

/// Deterministic blake3 hex digest of the canonical JSON encoding.
pub fn config_fingerprint(config: &AnalysisConfig) -> String {
    let json = serde_json::to_string(config).expect("AnalysisConfig serialization failed");
    blake3::hash(json.as_bytes()).to_hex().to_string()
}
