//! # Tripwire Core - Scan Orchestration
//!
//! The embedding surface of Agent Tripwire. [`Scanner`] wires the detection
//! layers from `tripwire-detect` into one pipeline and folds their verdicts
//! into a single [`ScanResult`] per message.
//!
//! ## Pipeline
//!
//! ```text
//!                      +--> signature ----------+
//!                      +--> encoding -----------+
//!   message text ------+--> entropy/credential -+--> merge --> ScanResult
//!                      +--> heuristic ----------+
//!                      +--> canary (handoffs) --+
//! ```
//!
//! Every layer runs unconditionally on every scan; the canary layer joins
//! in only when the caller identifies the sending agent. Layers never
//! short-circuit one another: a message that trips the signature layer is
//! still decoded, entropy-checked, and heuristic-checked, so the report
//! shows everything that fired.
//!
//! ## Smoke-detector semantics
//!
//! The engine observes and classifies. It never blocks, rewrites, or delays
//! the text it inspects; acting on a verdict is the embedder's decision.
//!
//! ## Quick start
//!
//! ```rust
//! use tripwire_core::{Scanner, Severity};
//!
//! let scanner = Scanner::new()?;
//!
//! // Tag an agent's outgoing text so later hops can detect leakage.
//! let outgoing = scanner.tag_output("research summary", "agent_a");
//!
//! // Scan text arriving at another agent.
//! let result = scanner.scan(&outgoing, "agent_b", Some("agent_a"));
//! assert_eq!(result.severity, Severity::Critical); // the token leaked
//! # Ok::<(), tripwire_core::ScanError>(())
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod scanner;

pub use config::ScannerConfig;
pub use error::ScanError;
pub use report::ScanResult;
pub use scanner::Scanner;

// Re-export the detection vocabulary so embedders depend on one crate.
pub use tripwire_detect::{
    CanaryStore, EncodingKind, Finding, HeuristicKind, Layer, LayerResult, Severity,
};
