//! Word tokenization shared by the text heuristics.

use std::collections::HashSet;

use super::stopwords::is_stopword;
use crate::defaults::MIN_KEYWORD_LEN;

/// Combining dot above, left behind when `İ` (U+0130) is lower-cased.
const COMBINING_DOT_ABOVE: char = '\u{307}';

/// Lower-case `text` so Turkish dotted capitals fold onto plain `i`.
pub(crate) fn fold_case(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.contains(COMBINING_DOT_ABOVE) {
        lower.replace(COMBINING_DOT_ABOVE, "")
    } else {
        lower
    }
}

/// Lower-cased tokens split on every non-letter character.
pub(crate) fn letter_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .map(fold_case)
}

/// Letter tokens that can carry meaning: long enough and not a stop-word.
pub(crate) fn content_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    letter_tokens(text).filter(|t| t.chars().count() >= MIN_KEYWORD_LEN && !is_stopword(t))
}

/// Set of lower-cased alphanumeric words.
pub(crate) fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(fold_case)
        .collect()
}
