//! Cheap structural red flags.
//!
//! None of these checks understands content; each looks for a shape that
//! legitimate inter-agent messages rarely have - letters spaced out to dodge
//! phrase matching, one giant token, a whole message in upper-case, and so
//! on. Every check is independent, every finding is Warning, and this layer
//! never escalates to Critical on its own.

use regex::Regex;

use crate::error::DetectError;
use crate::models::{Finding, HeuristicKind, Layer, LayerResult, Severity};

/// How many consecutive identical characters count as a repetition flag.
const REPEAT_RUN: usize = 5;

/// Upper-case check only applies above this length.
const ALL_CAPS_MIN_LEN: usize = 20;

/// Whitespace-delimited tokens longer than this are flagged.
const LONG_TOKEN_LEN: usize = 40;

/// The heuristic layer.
pub struct HeuristicDetector {
    // Five or more consecutive single-character words.
    spaced_letters: Regex,
    role_switch: Regex,
    encoded_string: Regex,
}

impl HeuristicDetector {
    /// Compile the check patterns.
    pub fn new() -> Result<Self, DetectError> {
        Ok(Self {
            spaced_letters: Regex::new(r"(?:\b\w\s){4,}\w\b")?,
            role_switch: Regex::new(
                r"you are now|act as|pretend to be|roleplay as|simulate|from now on you",
            )?,
            encoded_string: Regex::new(r"^[A-Za-z0-9+/=]{40,}$")?,
        })
    }

    /// Run every check; each may contribute one or more findings.
    pub fn detect(&self, text: &str) -> LayerResult {
        let mut findings = Vec::new();
        let mut flag = |kind| findings.push(Finding::Heuristic { kind });

        // Phrase-level checks run on a lowercased, punctuation-stripped
        // copy so "Y.O.U. A.R.E. N.O.W." style tricks still register.
        let stripped: String = text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();

        if self.spaced_letters.is_match(&stripped) {
            flag(HeuristicKind::CharSpacing);
        }

        if has_repeat_run(text, REPEAT_RUN) {
            flag(HeuristicKind::CharRepetition);
        }

        if text.chars().count() > ALL_CAPS_MIN_LEN && text.to_uppercase() == text {
            flag(HeuristicKind::AllCaps);
        }

        if self.role_switch.is_match(&stripped) {
            flag(HeuristicKind::RoleSwitch);
        }

        for token in text.split_whitespace() {
            if token.chars().count() > LONG_TOKEN_LEN {
                flag(HeuristicKind::LongToken);
            }
        }

        if self.encoded_string.is_match(&text.replace('\n', "")) {
            flag(HeuristicKind::EncodedString);
        }

        LayerResult::graded(Layer::Heuristic, findings, Severity::Warning)
    }
}

/// True if any character repeats `run` or more times consecutively.
///
/// The regex crate has no backreferences, so this is a plain linear scan.
fn has_repeat_run(text: &str, run: usize) -> bool {
    let mut previous: Option<char> = None;
    let mut count = 0;
    for c in text.chars() {
        if Some(c) == previous {
            count += 1;
            if count >= run {
                return true;
            }
        } else {
            previous = Some(c);
            count = 1;
        }
    }
    false
}
