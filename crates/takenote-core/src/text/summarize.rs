//! Extractive summarization by sentence scoring.

use std::collections::HashMap;

use super::keywords::keyword_frequencies;
use super::tokenize::content_tokens;
use crate::defaults::{FREQ_WEIGHT, POSITION_WEIGHT, TOP_TERMS};

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’' | '»')
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if sentence.chars().any(char::is_alphanumeric) {
        out.push(sentence.to_string());
    }
}

/// Split `text` into trimmed sentences.
///
/// A sentence ends at `.`, `!`, `?` or `…` followed by whitespace or the end
/// of the text. Repeated terminators and closing quotes or brackets stay with
/// the sentence they close, so `"Wait..."` and `(done!)` are single units.
/// Trailing text without a terminator is its own sentence. Fragments without
/// any letter or digit are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        while chars
            .peek()
            .is_some_and(|&(_, next)| is_terminator(next) || is_closer(next))
        {
            chars.next();
        }
        match chars.peek() {
            Some(&(end, next)) if next.is_whitespace() => {
                push_sentence(&mut sentences, &text[start..end]);
                start = end;
            }
            None => {
                push_sentence(&mut sentences, &text[start..]);
                start = text.len();
            }
            // "3.14", "e.g.x": not a boundary
            Some(_) => {}
        }
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

/// Pick the `n` most representative sentences of `text`, in source order.
///
/// Each sentence is scored as `FREQ_WEIGHT * f + POSITION_WEIGHT * p`, where
/// `f` is the mean weight of its content words (a word's weight is its count
/// relative to the most frequent term, and only the document's `TOP_TERMS`
/// terms carry weight) and `p` decays linearly from 1.0 for the first
/// sentence. Ties go to the earlier sentence.
///
/// # Examples
///
/// ```
/// use takenote_core::summarize;
///
/// let text = "The cat sat. The cat ran fast. Dogs bark loudly at night.";
/// assert_eq!(summarize(text, 2), vec!["The cat sat.", "The cat ran fast."]);
/// ```
pub fn summarize(text: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    let sentences = split_sentences(text);
    if sentences.len() <= n {
        return sentences;
    }

    let top_terms: Vec<(String, usize)> = keyword_frequencies(text)
        .into_iter()
        .take(TOP_TERMS)
        .collect();
    let max_count = top_terms.first().map(|(_, c)| *c).unwrap_or(1).max(1) as f32;
    let weights: HashMap<String, f32> = top_terms
        .into_iter()
        .map(|(term, count)| (term, count as f32 / max_count))
        .collect();

    let total = sentences.len() as f32;
    let mut scored: Vec<(usize, f32)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let (sum, len) = content_tokens(sentence).fold((0.0f32, 0usize), |(sum, len), t| {
                (sum + weights.get(&t).copied().unwrap_or(0.0), len + 1)
            });
            let freq = if len == 0 { 0.0 } else { sum / len as f32 };
            let position = 1.0 - i as f32 / total;
            (i, FREQ_WEIGHT * freq + POSITION_WEIGHT * position)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut picked: Vec<usize> = scored.into_iter().take(n).map(|(i, _)| i).collect();
    picked.sort_unstable();

    picked.into_iter().map(|i| sentences[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(
            split_sentences("One here. Two there! Three? Four"),
            vec!["One here.", "Two there!", "Three?", "Four"]
        );
    }

    #[test]
    fn test_split_keeps_runs_and_closers() {
        assert_eq!(
            split_sentences("Wait... what?! She said \"stop.\" Then (quietly!) left."),
            vec!["Wait...", "what?!", "She said \"stop.\"", "Then (quietly!)", "left."]
        );
    }

    #[test]
    fn test_split_ignores_inner_dots() {
        assert_eq!(
            split_sentences("Pi is 3.14 roughly. Version v1.2.3 shipped."),
            vec!["Pi is 3.14 roughly.", "Version v1.2.3 shipped."]
        );
    }

    #[test]
    fn test_split_drops_punctuation_only_fragments() {
        assert_eq!(split_sentences("... !!! Real one."), vec!["Real one."]);
        assert!(split_sentences("?!").is_empty());
    }

    #[test]
    fn test_split_ellipsis_char() {
        assert_eq!(split_sentences("Hmm… okay."), vec!["Hmm…", "okay."]);
    }

    #[test]
    fn test_summarize_prefers_frequent_terms() {
        let text = "The cat sat. The cat ran fast. Dogs bark loudly at night.";
        assert_eq!(summarize(text, 2), vec!["The cat sat.", "The cat ran fast."]);
    }

    #[test]
    fn test_summarize_keeps_source_order() {
        let text = "Weather was mild. Rust compiler errors help. \
                    Rust borrow checker rules. Lunch was fine. Rust traits compose.";
        let out = summarize(text, 2);
        assert_eq!(out.len(), 2);
        let positions: Vec<usize> = out
            .iter()
            .map(|s| text.find(s.as_str()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_summarize_fewer_sentences_than_requested() {
        let text = "Only one sentence here. And a second.";
        assert_eq!(
            summarize(text, 5),
            vec!["Only one sentence here.", "And a second."]
        );
    }

    #[test]
    fn test_summarize_empty_inputs() {
        for n in [0, 1, 3, 100] {
            assert!(summarize("", n).is_empty());
            assert!(summarize("   ", n).is_empty());
        }
    }

    #[test]
    fn test_summarize_zero_count() {
        assert!(summarize("Some text. More text.", 0).is_empty());
    }

    #[test]
    fn test_summarize_ties_favor_earlier_sentences() {
        // no content words at all: position decides
        let text = "It is. So be it. As it is. Or not.";
        assert_eq!(summarize(text, 2), vec!["It is.", "So be it."]);
    }
}
