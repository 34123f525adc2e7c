//! Frequency-based keyword extraction.

use std::collections::HashMap;

use super::tokenize::content_tokens;

/// Content terms of `text` with their counts, most frequent first.
///
/// Terms are lower-cased, so each appears once regardless of case. Equal
/// counts keep first-occurrence order.
pub fn keyword_frequencies(text: &str) -> Vec<(String, usize)> {
    // term -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (pos, token) in content_tokens(text).enumerate() {
        counts.entry(token).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(term, count, _)| (term, count))
        .collect()
}

/// Up to `k` keywords of `text`, most relevant first.
///
/// # Examples
///
/// ```
/// use takenote_core::extract_keywords;
///
/// let tags = extract_keywords("apple apple banana banana banana cherry", 2);
/// assert_eq!(tags, vec!["banana", "apple"]);
/// ```
pub fn extract_keywords(text: &str, k: usize) -> Vec<String> {
    keyword_frequencies(text)
        .into_iter()
        .take(k)
        .map(|(term, _)| term)
        .collect()
}
