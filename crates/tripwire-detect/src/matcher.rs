//! Multi-pattern signature matching.
//!
//! The generated corpus runs to tens of thousands of phrases, so per-phrase
//! substring search is a non-starter. An Aho-Corasick automaton gives one
//! linear pass over the input regardless of corpus size. Matching is
//! overlapping on purpose - this layer favors recall, and any hit already
//! means Critical.

use std::sync::{Arc, OnceLock};

use aho_corasick::AhoCorasick;

use crate::error::DetectError;
use crate::models::{Finding, Layer, LayerResult, Severity, SignatureHit};
use crate::normalize::normalize;
use crate::signatures::generate_corpus;

/// Compiled signature automaton plus the phrase list it was built from.
///
/// Immutable after construction; safe for unlimited concurrent read-only
/// use. Build once via [`SignatureMatcher::shared`] and clone the handle.
pub struct SignatureMatcher {
    automaton: AhoCorasick,
    phrases: Vec<String>,
}

impl SignatureMatcher {
    /// Build a fresh matcher from the generated corpus.
    ///
    /// This is the expensive path (corpus generation + automaton
    /// construction); production callers should prefer [`Self::shared`].
    pub fn build() -> Result<Self, DetectError> {
        let phrases = generate_corpus();
        let automaton = AhoCorasick::new(&phrases)?;
        Ok(Self { automaton, phrases })
    }

    /// The process-wide shared matcher, built on first use.
    pub fn shared() -> Result<Arc<Self>, DetectError> {
        static SHARED: OnceLock<Arc<SignatureMatcher>> = OnceLock::new();
        if let Some(matcher) = SHARED.get() {
            return Ok(Arc::clone(matcher));
        }
        let built = Arc::new(Self::build()?);
        // A concurrent initializer may win the race; either instance is
        // equivalent, keep whichever landed.
        Ok(Arc::clone(SHARED.get_or_init(|| built)))
    }

    /// Number of phrases in the corpus.
    pub fn corpus_size(&self) -> usize {
        self.phrases.len()
    }

    /// Find every occurrence of every corpus phrase in `normalized` text.
    ///
    /// The input must already be normalized; offsets in the returned hits
    /// are byte positions into it. Overlapping matches are all reported.
    pub fn find(&self, normalized: &str) -> Vec<SignatureHit> {
        self.automaton
            .find_overlapping_iter(normalized)
            .map(|m| SignatureHit {
                start: m.start(),
                end: m.end(),
                pattern: self.phrases[m.pattern().as_usize()].clone(),
            })
            .collect()
    }

    /// Normalize `text` and run the full layer: any hit is Critical.
    pub fn scan(&self, text: &str) -> LayerResult {
        let findings = self
            .find(&normalize(text))
            .into_iter()
            .map(|hit| Finding::Signature { hit })
            .collect();
        LayerResult::graded(Layer::Signature, findings, Severity::Critical)
    }
}
