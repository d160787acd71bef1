//! Text normalization applied before signature matching.
//!
//! Adversaries dodge literal phrase matching with fullwidth/compatibility
//! codepoints (`ｉｇｎｏｒｅ`), zero-width characters spliced into words, case
//! games, and whitespace padding. [`normalize`] canonicalizes all of that
//! away so the signature corpus only ever has to describe one surface form.

use unicode_normalization::UnicodeNormalization;

/// Invisible codepoints stripped outright: zero-width space, zero-width
/// non-joiner, zero-width joiner, word joiner, byte-order mark.
const ZERO_WIDTH: [char; 5] = ['\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{feff}'];

/// Canonicalize text for matching.
///
/// Applies, in order:
/// 1. Unicode NFKC (compatibility decomposition + canonical recomposition),
///    which folds fullwidth and compatibility substitutions back to ASCII.
/// 2. Removal of the fixed zero-width/invisible set.
/// 3. Lowercase folding.
/// 4. Whitespace collapse: any run of whitespace becomes a single space,
///    leading/trailing whitespace is trimmed.
///
/// Total and pure: never fails, and `normalize(normalize(x)) ==
/// normalize(x)`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
