//! # Tripwire Detect - Detection Layers
//!
//! The detection layers behind Agent Tripwire, a passive inspection engine
//! for text passing between cooperating software agents. Each layer looks
//! at one class of signal and reports independently; the orchestrator in
//! `tripwire-core` merges the verdicts.
//!
//! ## Layers
//!
//! | Layer | Signal | Severity on hit |
//! |-------|--------|-----------------|
//! | [`matcher`] | Corpus phrases ("ignore previous instructions" variants) | Critical |
//! | [`decoder`] | Hex/base64/percent-encoded payloads, recursively unwrapped | Critical |
//! | [`credential`] | Known secret shapes + high-entropy tokens | Critical / Warning |
//! | [`heuristic`] | Structural red flags (spacing, caps, giant tokens) | Warning |
//! | [`canary`] | Another agent's canary token in this input | Critical |
//!
//! ## Architecture
//!
//! ```text
//! raw text ──┬── normalize ──► SIGNATURE MATCHER (Aho-Corasick corpus)
//!            ├────────────────► RECURSIVE DECODER ──► matcher (per level)
//!            ├────────────────► CREDENTIAL / ENTROPY
//!            ├────────────────► HEURISTICS
//!            └────────────────► CANARY CHECK (other agents' live tokens)
//! ```
//!
//! The signature corpus is generated by cross-producting four lexical
//! classes ([`signatures`]) and compiled once per process into an
//! Aho-Corasick automaton, so matching stays linear in input length no
//! matter how large the corpus grows.
//!
//! ## Smoke-detector semantics
//!
//! Nothing in this crate blocks, rewrites, or rejects text. Layers observe
//! and classify; what to do with a verdict is the embedder's decision.
//! Scanning is total: malformed, hostile, or deeply nested input produces
//! findings or nothing, never an error. Only detector *construction* can
//! fail (a regex or automaton that will not compile), and that surfaces as
//! [`DetectError`].
//!
//! ## References
//!
//! - Perez & Ribeiro (2022) - "Ignore This Title and HackAPrompt" -
//!   direct-injection phrasing this corpus generalizes.
//! - Greshake et al. (2023) - "Not What You've Signed Up For" - indirect
//!   injection via inter-agent content, the deployment this engine watches.
//! - Rebuff (ProtectAI) - canary-token leak detection.

pub mod canary;
pub mod credential;
pub mod decoder;
pub mod error;
pub mod heuristic;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod signatures;

pub use canary::{CanaryLeak, CanaryStore};
pub use credential::{shannon_entropy, CredentialDetector, ENTROPY_THRESHOLD, MIN_TOKEN_LENGTH};
pub use decoder::{EncodingScanner, MAX_DECODE_DEPTH};
pub use error::DetectError;
pub use heuristic::HeuristicDetector;
pub use matcher::SignatureMatcher;
pub use models::{
    EncodingKind, Finding, HeuristicKind, Layer, LayerResult, Severity, SignatureHit,
};
pub use normalize::normalize;
