//! Fallback text analysis.
//!
//! Lexical heuristics used when the hosted models are unreachable, time out,
//! or are disabled: extractive summarization, keyword extraction, query/document
//! similarity, and rule-based categorization.
//!
//! Every function here is pure and total. Any string input, including empty or
//! non-linguistic text, produces a result; none of them perform I/O.

mod categorize;
mod keywords;
mod similarity;
mod stopwords;
mod summarize;
mod tokenize;

pub use categorize::categorize;
pub use keywords::{extract_keywords, keyword_frequencies};
pub use similarity::similarity;
pub use stopwords::is_stopword;
pub use summarize::{split_sentences, summarize};

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Convert a caller-supplied count to a limit, treating negatives as zero.
pub fn clamp_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(-5), 0);
        assert_eq!(clamp_count(0), 0);
        assert_eq!(clamp_count(7), 7);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("çğüşö", 3), "çğü");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
