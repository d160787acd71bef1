//! # Canary Token Tracking Across Agents
//!
//! A canary token is a unique, unpredictable marker issued for one agent's
//! outgoing text. If agent A's token later shows up verbatim in agent C's
//! input - and no direct A→C data path is expected - that is strong,
//! model-independent evidence of context leakage or a confused-deputy
//! routing error.
//!
//! ## How it works
//!
//! 1. **Issuance**: [`CanaryStore::issue`] mints a fresh UUIDv4-based token
//!    for an agent and stores it. Re-issuing overwrites; one live token per
//!    agent.
//! 2. **Embedding**: the caller appends the token to the agent's outgoing
//!    text ([`CanaryStore::tag`] does this as an inert HTML-comment
//!    trailer).
//! 3. **Leak check**: [`CanaryStore::check`] scans any later text for every
//!    *other* agent's live token. An agent's own token is never a leak
//!    against itself.
//!
//! Tokens carry a fixed, greppable prefix. That reveals canaries are in
//! use, which is a deliberate trade-off: an attacker who knows about them
//! still cannot avoid detection without filtering the token out of the
//! text, and the prefix makes leaked tokens easy to audit in logs.
//!
//! Tokens have no expiry: the store lives for the process lifetime and
//! re-issuance silently invalidates the previous token.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

/// Fixed token prefix, for greppability and audit.
const TOKEN_PREFIX: &str = "twc";

/// One leaked token: which agent it belonged to, and the token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanaryLeak {
    /// The agent the token was issued to.
    pub owner: String,
    /// The leaked token.
    pub token: String,
}

/// Process-wide registry of live canary tokens, one per agent.
///
/// Explicitly owned rather than ambient global state, so tests (and
/// embedders running several isolated pipelines) can hold separate stores.
/// The interior lock is held only for the brief map insert or snapshot,
/// never across a text scan.
#[derive(Debug, Default)]
pub struct CanaryStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl CanaryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token for `agent_id`, replacing any previous one.
    ///
    /// UUIDv4 gives 122 random bits; guessing or forging a live token is
    /// not practical.
    pub fn issue(&self, agent_id: &str) -> String {
        let token = format!("{}-{}", TOKEN_PREFIX, Uuid::new_v4().simple());
        let previous = self
            .tokens
            .lock()
            .expect("canary store lock poisoned")
            .insert(agent_id.to_string(), token.clone());
        debug!(agent = agent_id, replaced = previous.is_some(), "issued canary token");
        token
    }

    /// The live token for `agent_id`, if one has been issued.
    pub fn token_for(&self, agent_id: &str) -> Option<String> {
        self.tokens
            .lock()
            .expect("canary store lock poisoned")
            .get(agent_id)
            .cloned()
    }

    /// Issue a token for `agent_id` and append it to `text` as an inert
    /// trailing marker.
    pub fn tag(&self, text: &str, agent_id: &str) -> String {
        let token = self.issue(agent_id);
        format!("{text}\n<!-- {token} -->")
    }

    /// Scan `text` for every agent's live token except `exclude_agent`'s.
    ///
    /// Leaks are returned in no particular order (map iteration order).
    pub fn check(&self, text: &str, exclude_agent: &str) -> Vec<CanaryLeak> {
        // Snapshot under the lock; substring search happens lock-free.
        let snapshot: Vec<(String, String)> = self
            .tokens
            .lock()
            .expect("canary store lock poisoned")
            .iter()
            .filter(|(owner, _)| owner.as_str() != exclude_agent)
            .map(|(owner, token)| (owner.clone(), token.clone()))
            .collect();

        snapshot
            .into_iter()
            .filter(|(_, token)| text.contains(token))
            .map(|(owner, token)| CanaryLeak { owner, token })
            .collect()
    }

    /// Number of agents with a live token.
    pub fn len(&self) -> usize {
        self.tokens.lock().expect("canary store lock poisoned").len()
    }

    /// True if no tokens have been issued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
