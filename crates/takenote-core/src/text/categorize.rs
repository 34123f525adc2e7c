//! Rule-based note categorization.

use super::tokenize::word_set;
use crate::defaults::GENERAL_CATEGORY_CONFIDENCE;
use crate::models::ScoredLabel;

struct Bucket {
    label: &'static str,
    confidence: f32,
    keywords: &'static [&'static str],
}

const BUCKETS: &[Bucket] = &[
    Bucket {
        label: "work",
        confidence: 0.8,
        keywords: &[
            "work", "job", "meeting", "project", "task", "business", "deadline", "client", "team",
        ],
    },
    Bucket {
        label: "education",
        confidence: 0.7,
        keywords: &[
            "study", "learn", "education", "school", "university", "course", "exam", "homework",
            "lesson", "research",
        ],
    },
    Bucket {
        label: "personal",
        confidence: 0.6,
        keywords: &[
            "personal", "life", "family", "friend", "home", "hobby", "vacation", "birthday",
        ],
    },
    Bucket {
        label: "creative",
        confidence: 0.7,
        keywords: &["idea", "creative", "design", "art", "inspiration"],
    },
    Bucket {
        label: "health",
        confidence: 0.7,
        keywords: &[
            "doctor", "medicine", "exercise", "diet", "health", "appointment", "symptoms",
        ],
    },
    Bucket {
        label: "finance",
        confidence: 0.7,
        keywords: &[
            "money", "budget", "expense", "income", "investment", "bill", "payment",
        ],
    },
    Bucket {
        label: "shopping",
        confidence: 0.6,
        keywords: &["buy", "purchase", "shop", "price", "discount", "store", "cart"],
    },
];

/// Categories whose keywords occur in `text`, highest confidence first.
///
/// Keywords match whole words, singular or with a plural `s`. Text matching no
/// bucket is `general`.
pub fn categorize(text: &str) -> Vec<ScoredLabel> {
    let words = word_set(text);
    let mut matched: Vec<ScoredLabel> = BUCKETS
        .iter()
        .filter(|bucket| {
            bucket
                .keywords
                .iter()
                .any(|k| words.contains(*k) || words.contains(&format!("{}s", k)))
        })
        .map(|bucket| ScoredLabel {
            label: bucket.label.to_string(),
            score: bucket.confidence,
        })
        .collect();

    if matched.is_empty() {
        return vec![ScoredLabel {
            label: "general".to_string(),
            score: GENERAL_CATEGORY_CONFIDENCE,
        }];
    }

    // stable: equal confidences keep bucket order
    matched.sort_by(|a, b| b.score.total_cmp(&a.score));
    matched
}
