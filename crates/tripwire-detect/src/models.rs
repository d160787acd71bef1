//! # Result Model for the Detection Layers
//!
//! Shared types describing what a layer found and how bad it is.
//!
//! ## Design Principles
//!
//! 1. **Ordinal severity** - [`Severity`] is a total order (`None < Warning <
//!    Critical`) merged by maximum, so combining layer verdicts is
//!    associative and commutative.
//! 2. **Tagged findings** - every detector reports through the one
//!    [`Finding`] enum, keyed by detector kind, so audit consumers get a
//!    uniform shape.
//! 3. **Serializable** - all types derive Serde traits; external consumers
//!    log or export them, the engine itself persists nothing.
//! 4. **Redaction first** - findings carry bounded previews, never full
//!    secret material.

use serde::{Deserialize, Serialize};

/// Ordinal verdict level for a layer or a whole scan.
///
/// The derived `Ord` follows declaration order, which is the contract:
/// `None < Warning < Critical`. Merging any number of layer severities is
/// `iter().max()`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Nothing suspicious.
    #[default]
    None,
    /// Structurally unusual; worth a look, not a strong signal on its own.
    Warning,
    /// Strong indicator of injection, leakage, or obfuscation.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// One independent detection layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Multi-pattern signature automaton over normalized text.
    Signature,
    /// Recursive multi-encoding decoder.
    Encoding,
    /// Credential regexes plus high-entropy token heuristic.
    EntropyCredential,
    /// Cheap structural red flags.
    Heuristic,
    /// Cross-agent canary token tracker.
    Canary,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signature => write!(f, "signature"),
            Self::Encoding => write!(f, "encoding"),
            Self::EntropyCredential => write!(f, "entropy_credential"),
            Self::Heuristic => write!(f, "heuristic"),
            Self::Canary => write!(f, "canary"),
        }
    }
}

/// Encoding scheme recognized by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingKind {
    /// Contiguous hex-digit pairs.
    Hex,
    /// Standard-alphabet base64.
    Base64,
    /// Percent (URL) encoding.
    UrlEncoded,
}

impl std::fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
            Self::UrlEncoded => write!(f, "url_encoded"),
        }
    }
}

/// One occurrence of a corpus phrase in normalized text.
///
/// Offsets are byte positions into the *normalized* form, which is what the
/// automaton actually searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHit {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// The corpus phrase that matched.
    pub pattern: String,
}

/// Structural red flags raised by the heuristic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Run of single-character "words" (i g n o r e ...).
    CharSpacing,
    /// Same character repeated five or more times.
    CharRepetition,
    /// Whole string over 20 chars and entirely upper-case.
    AllCaps,
    /// Role-reassignment phrasing ("you are now", "act as", ...).
    RoleSwitch,
    /// A whitespace-delimited token longer than 40 characters.
    LongToken,
    /// The whole string looks like one base64 blob.
    EncodedString,
}

/// A single piece of evidence from one detection layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    /// A corpus phrase matched the (plaintext) normalized input.
    Signature {
        /// Where and what matched.
        #[serde(flatten)]
        hit: SignatureHit,
    },

    /// Corpus phrases matched inside a decoded payload.
    Direct {
        /// Decode depth of the text the hits were found in (0 = as given).
        depth: usize,
        /// The matches, in automaton discovery order.
        hits: Vec<SignatureHit>,
    },

    /// An encoded substring successfully decoded to text.
    Decoded {
        /// Which encoding was unwrapped.
        encoding: EncodingKind,
        /// Depth of the decoded payload (parent depth + 1).
        depth: usize,
        /// Bounded prefix of the decoded text. Never the full payload.
        preview: String,
    },

    /// A known credential/secret shape matched.
    Credential {
        /// Category label from the pattern table (e.g. `jwt_token`).
        category: String,
    },

    /// A statistically unusual token (possible secret material).
    HighEntropy {
        /// Redacted prefix of the token plus ellipsis.
        preview: String,
        /// Measured Shannon entropy in bits per character.
        entropy: f64,
        /// Full token length in characters.
        length: usize,
    },

    /// A structural red flag.
    Heuristic {
        /// Which check fired.
        kind: HeuristicKind,
    },

    /// Another agent's canary token appeared in this input.
    CanaryLeak {
        /// Agent whose token leaked.
        leaked_from: String,
        /// Agent whose input contained it.
        found_in: String,
        /// The leaked token.
        token: String,
    },
}

/// The verdict of one detection layer for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    /// Which layer produced this.
    pub layer: Layer,
    /// Whether the layer found anything at all.
    pub detected: bool,
    /// The layer's severity contribution.
    pub severity: Severity,
    /// Evidence in discovery order.
    pub findings: Vec<Finding>,
}

impl LayerResult {
    /// Build a result whose severity is `hit_severity` if there are any
    /// findings and [`Severity::None`] otherwise.
    pub fn graded(layer: Layer, findings: Vec<Finding>, hit_severity: Severity) -> Self {
        let detected = !findings.is_empty();
        Self {
            layer,
            detected,
            severity: if detected { hit_severity } else { Severity::None },
            findings,
        }
    }

    /// Build a result with an explicitly chosen severity.
    pub fn with_severity(layer: Layer, findings: Vec<Finding>, severity: Severity) -> Self {
        Self {
            layer,
            detected: !findings.is_empty(),
            severity,
            findings,
        }
    }

    /// A clean result for this layer.
    pub fn clean(layer: Layer) -> Self {
        Self {
            layer,
            detected: false,
            severity: Severity::None,
            findings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_total_order() {
        assert!(Severity::None < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(
            [Severity::Warning, Severity::None, Severity::Critical]
                .into_iter()
                .max(),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn severity_merge_is_order_independent() {
        let a = [Severity::None, Severity::Critical, Severity::Warning];
        let b = [Severity::Warning, Severity::None, Severity::Critical];
        assert_eq!(a.into_iter().max(), b.into_iter().max());
    }

    #[test]
    fn graded_result_clean_when_empty() {
        let result = LayerResult::graded(Layer::Signature, vec![], Severity::Critical);
        assert!(!result.detected);
        assert_eq!(result.severity, Severity::None);
    }

    #[test]
    fn graded_result_takes_hit_severity() {
        let finding = Finding::Heuristic {
            kind: HeuristicKind::AllCaps,
        };
        let result = LayerResult::graded(Layer::Heuristic, vec![finding], Severity::Warning);
        assert!(result.detected);
        assert_eq!(result.severity, Severity::Warning);
    }

    #[test]
    fn finding_serializes_tagged() {
        let finding = Finding::Credential {
            category: "jwt_token".to_string(),
        };
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains(r#""type":"credential""#));
        assert!(json.contains(r#""category":"jwt_token""#));
    }

    #[test]
    fn layer_display_names() {
        assert_eq!(Layer::EntropyCredential.to_string(), "entropy_credential");
        assert_eq!(Layer::Canary.to_string(), "canary");
    }
}
