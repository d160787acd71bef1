//! Error types for the Scanner facade.
//!
//! Only construction can fail. A built [`crate::Scanner`] never errors on
//! input: "no threat found" and "malformed input" are both ordinary scan
//! outcomes, not failures.

use thiserror::Error;

/// Errors raised while building a [`crate::Scanner`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// A detection layer failed to build (regex or automaton compilation).
    #[error("detector construction failed: {0}")]
    Detect(#[from] tripwire_detect::DetectError),
}
