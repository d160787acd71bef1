//! Error types for the detection layers.
//!
//! Construction is the only fallible phase: regexes and the signature
//! automaton are compiled once when a detector is built. Scanning itself is
//! total - malformed, hostile, or deeply nested input yields findings (or
//! nothing), never an error.

use thiserror::Error;

/// Errors raised while building a detector.
#[derive(Debug, Error)]
pub enum DetectError {
    /// A detector regex failed to compile.
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    /// The signature automaton failed to build.
    #[error("signature automaton build failed: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}
