//! Configuration for the Scanner.

use serde::{Deserialize, Serialize};

use tripwire_detect::{ENTROPY_THRESHOLD, MAX_DECODE_DEPTH, MIN_TOKEN_LENGTH};

/// Tunables for the scan pipeline.
///
/// The defaults reproduce the engine's reference behavior; embedders
/// normally only touch `preview_chars` (audit verbosity) or
/// `entropy_threshold` (false-positive pressure on dense technical text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// How many characters of the raw input are kept in
    /// `ScanResult::input_preview` for audit. Full payloads are never
    /// stored.
    pub preview_chars: usize,

    /// Shannon-entropy threshold (bits/char) for the high-entropy token
    /// pass. Lower is more aggressive.
    pub entropy_threshold: f64,

    /// Minimum token length considered for entropy analysis.
    pub min_entropy_token_length: usize,

    /// Maximum decode depth for the recursive decoder (inclusive).
    pub max_decode_depth: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            preview_chars: 100,
            entropy_threshold: ENTROPY_THRESHOLD,
            min_entropy_token_length: MIN_TOKEN_LENGTH,
            max_decode_depth: MAX_DECODE_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_behavior() {
        let config = ScannerConfig::default();
        assert_eq!(config.preview_chars, 100);
        assert_eq!(config.max_decode_depth, 3);
        assert!((config.entropy_threshold - 4.2).abs() < f64::EPSILON);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ScannerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ScannerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.preview_chars, config.preview_chars);
        assert_eq!(parsed.max_decode_depth, config.max_decode_depth);
    }
}
