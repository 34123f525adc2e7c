//! Lexical query/document similarity.

use super::tokenize::{fold_case, word_set};
use crate::defaults::SUBSTRING_BONUS;

/// Similarity of `query` to `doc` in `[0, 1]`.
///
/// Jaccard overlap of the lower-cased word sets, plus `SUBSTRING_BONUS` when
/// the trimmed query appears verbatim (case-insensitive) in the document.
/// Identical non-empty inputs score exactly 1.0; an empty query scores 0.0.
///
/// This is lexical overlap, not semantic similarity: synonyms do not match.
pub fn similarity(query: &str, doc: &str) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    if query == doc {
        return 1.0;
    }

    let q_norm = fold_case(query.trim());
    if q_norm.is_empty() {
        return 0.0;
    }
    let d_norm = fold_case(doc.trim());
    if q_norm == d_norm {
        return 1.0;
    }

    let q_words = word_set(query);
    let d_words = word_set(doc);
    let union = q_words.union(&d_words).count();
    let jaccard = if union == 0 {
        0.0
    } else {
        q_words.intersection(&d_words).count() as f32 / union as f32
    };

    let bonus = if d_norm.contains(&q_norm) {
        SUBSTRING_BONUS
    } else {
        0.0
    };

    (jaccard + bonus).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_scores_positive() {
        let s = similarity("urgent meeting tomorrow", "we have an urgent meeting scheduled");
        assert!(s > 0.0);
        // 2 shared of 7 distinct words, no verbatim match
        assert!((s - 2.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_identity_is_one() {
        for q in ["hello", "  padded  ", "!!!", "Çok güzel"] {
            assert_eq!(similarity(q, q), 1.0);
        }
    }

    #[test]
    fn test_case_only_difference_is_one() {
        assert_eq!(similarity("Grocery List", "grocery list"), 1.0);
    }

    #[test]
    fn test_empty_query_is_zero() {
        assert_eq!(similarity("", "anything at all"), 0.0);
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("   ", "anything"), 0.0);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert_eq!(similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_substring_bonus() {
        let with_phrase = similarity("meeting notes", "the weekly meeting notes are here");
        let scattered = similarity("meeting notes", "notes the weekly meeting are here");
        assert!(with_phrase > scattered);
        assert!((with_phrase - scattered - SUBSTRING_BONUS).abs() < 1e-6);
    }

    #[test]
    fn test_bonus_is_clamped() {
        let s = similarity("rust", "rust rust");
        assert!(s <= 1.0);
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(similarity("query", ""), 0.0);
    }
}
