//! Recursive multi-encoding decoder.
//!
//! Attackers hide signature phrases behind hex, base64, or percent
//! encoding - sometimes several layers deep. This layer finds
//! encoded-looking substrings, decodes them best-effort, and re-feeds every
//! successful decode through the signature matcher. Any obfuscation layer
//! that unwraps to text is treated as inherently suspicious, independent of
//! what the payload says.
//!
//! ## Bounds
//!
//! Adversarial input can nest or cycle indefinitely ("decode bombs"). Two
//! guards cap the work:
//!
//! - a depth limit ([`MAX_DECODE_DEPTH`], inclusive), and
//! - a seen-set keyed on the *normalized* form of each processed text, so a
//!   payload that decodes to itself or to an already-visited string
//!   terminates that branch.
//!
//! Traversal uses an explicit worklist rather than call-stack recursion, so
//! the stack bound is fixed no matter what the input does.
//!
//! Decode failures (bad padding, invalid bytes, non-UTF-8 output) are
//! expected outcomes and are silently dropped.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::DetectError;
use crate::matcher::SignatureMatcher;
use crate::models::{EncodingKind, Finding, Layer, LayerResult, Severity};
use crate::normalize::normalize;

/// Maximum decode depth, inclusive. Depth 0 is the input as given.
pub const MAX_DECODE_DEPTH: usize = 3;

/// Longest decoded-payload prefix recorded in a finding.
const PAYLOAD_PREVIEW_CHARS: usize = 120;

/// The recursive decoder layer.
pub struct EncodingScanner {
    matcher: Arc<SignatureMatcher>,
    max_depth: usize,
    hex_candidates: Regex,
    base64_candidates: Regex,
}

impl EncodingScanner {
    /// Build a decoder that re-feeds decoded payloads through `matcher`.
    pub fn new(matcher: Arc<SignatureMatcher>) -> Result<Self, DetectError> {
        Self::with_max_depth(matcher, MAX_DECODE_DEPTH)
    }

    /// Build with a custom depth limit (tests).
    pub fn with_max_depth(
        matcher: Arc<SignatureMatcher>,
        max_depth: usize,
    ) -> Result<Self, DetectError> {
        Ok(Self {
            matcher,
            max_depth,
            // At least 10 hex pairs (20 hex chars) on word boundaries.
            hex_candidates: Regex::new(r"\b(?:[0-9a-fA-F]{2}){10,}\b")?,
            // Standard-alphabet run of at least 20 chars, optional padding.
            base64_candidates: Regex::new(r"[A-Za-z0-9+/]{20,}={0,2}")?,
        })
    }

    /// Scan `text` and every decodable payload nested inside it.
    pub fn scan(&self, text: &str) -> LayerResult {
        let mut findings = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut work: VecDeque<(String, usize)> = VecDeque::new();
        seen.insert(normalize(text));
        work.push_back((text.to_string(), 0));

        while let Some((current, depth)) = work.pop_front() {
            if depth > self.max_depth {
                continue;
            }

            let hits = self.matcher.find(&normalize(&current));
            if !hits.is_empty() {
                findings.push(Finding::Direct { depth, hits });
            }

            for candidate in self.hex_candidates.find_iter(&current) {
                if let Some(decoded) = decode_hex(candidate.as_str()) {
                    self.enqueue(
                        EncodingKind::Hex,
                        decoded,
                        depth,
                        &mut seen,
                        &mut findings,
                        &mut work,
                    );
                }
            }

            for candidate in self.base64_candidates.find_iter(&current) {
                if let Some(decoded) = decode_base64(candidate.as_str()) {
                    self.enqueue(
                        EncodingKind::Base64,
                        decoded,
                        depth,
                        &mut seen,
                        &mut findings,
                        &mut work,
                    );
                }
            }

            if let Some(decoded) = decode_percent(&current) {
                self.enqueue(
                    EncodingKind::UrlEncoded,
                    decoded,
                    depth,
                    &mut seen,
                    &mut findings,
                    &mut work,
                );
            }
        }

        LayerResult::graded(Layer::Encoding, findings, Severity::Critical)
    }

    /// Record a successful decode and queue the payload for the next level.
    ///
    /// The payload is marked seen here, at enqueue time, so the same
    /// encoded blob appearing twice in one input yields one finding.
    fn enqueue(
        &self,
        encoding: EncodingKind,
        decoded: String,
        depth: usize,
        seen: &mut HashSet<String>,
        findings: &mut Vec<Finding>,
        work: &mut VecDeque<(String, usize)>,
    ) {
        if !seen.insert(normalize(&decoded)) {
            return;
        }
        findings.push(Finding::Decoded {
            encoding,
            depth: depth + 1,
            preview: decoded.chars().take(PAYLOAD_PREVIEW_CHARS).collect(),
        });
        work.push_back((decoded, depth + 1));
    }
}

/// Decode a run of hex pairs to text, or `None` if it is not valid UTF-8.
fn decode_hex(candidate: &str) -> Option<String> {
    let bytes = hex::decode(candidate).ok()?;
    String::from_utf8(bytes).ok()
}

/// Decode a base64 run to text, normalizing padding first.
///
/// Candidates are matched without regard to padding, so the tail is
/// re-padded to a multiple of four before a strict decode.
fn decode_base64(candidate: &str) -> Option<String> {
    let mut body = candidate.trim_end_matches('=').to_string();
    while body.len() % 4 != 0 {
        body.push('=');
    }
    let bytes = BASE64_STANDARD.decode(body).ok()?;
    String::from_utf8(bytes).ok()
}

/// Percent-decode the whole text; `None` if unchanged or not valid UTF-8.
fn decode_percent(text: &str) -> Option<String> {
    let decoded = percent_decode_str(text).decode_utf8().ok()?;
    if decoded == text {
        None
    } else {
        Some(decoded.into_owned())
    }
}
