//! Centralized default constants for the takenote backend.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// NOTE VALIDATION
// =============================================================================

/// Maximum note title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum note content length in characters.
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Maximum search query length in characters.
pub const QUERY_MAX_CHARS: usize = 100;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for note listing and search.
pub const PAGE_SIZE: u32 = 50;

/// Largest page size a client may request.
pub const PAGE_SIZE_MAX: u32 = 100;

/// First page number (pages are 1-based).
pub const PAGE_FIRST: u32 = 1;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Default rate limit: max requests per period per client.
pub const RATE_LIMIT_REQUESTS: u32 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Maximum request body size in bytes (10 MB).
pub const MAX_BODY_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Timeout for requests to the storage/auth platform in seconds.
pub const PLATFORM_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Hugging Face Inference API base URL.
pub const HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Summarization models, tried in order.
pub const HF_SUMMARY_MODELS: &[&str] = &[
    "facebook/bart-large-cnn",
    "google/pegasus-xsum",
    "sshleifer/distilbart-cnn-12-6",
];

/// Named-entity models used for tag extraction, tried in order.
pub const HF_NER_MODELS: &[&str] = &[
    "savasy/bert-base-turkish-ner-cased",
    "dbmdz/bert-large-cased-finetuned-conll03-english",
    "dslim/bert-base-NER",
];

/// Text classification model used for categorization.
pub const HF_CLASSIFY_MODEL: &str = "cardiffnlp/twitter-roberta-base-emotion";

/// Sentence-similarity models used for semantic search, tried in order.
pub const HF_SIMILARITY_MODELS: &[&str] = &[
    "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2",
    "sentence-transformers/all-MiniLM-L6-v2",
];

/// Timeout for a single external model call in seconds.
pub const AI_TIMEOUT_SECS: u64 = 30;

/// Characters of note text sent to summarization models.
pub const SUMMARY_INPUT_CHARS: usize = 1000;

/// Characters of note text sent to NER/classification models.
pub const CLASSIFY_INPUT_CHARS: usize = 512;

/// Characters of each note sent to sentence-similarity models.
pub const SIMILARITY_INPUT_CHARS: usize = 500;

/// Content shorter than this (in characters) is returned as its own summary.
pub const SUMMARY_MIN_INPUT_CHARS: usize = 50;

/// Content shorter than this (in characters) skips the NER models.
pub const TAG_MIN_INPUT_CHARS: usize = 50;

/// Summary length bounds passed to generative summarization models (tokens).
pub const SUMMARY_MAX_TOKENS: u32 = 150;
pub const SUMMARY_MIN_TOKENS: u32 = 30;

/// A model summary shorter than this is treated as a failed call.
pub const SUMMARY_MIN_OUTPUT_CHARS: usize = 10;

/// Default number of sentences in a fallback summary.
pub const SUMMARY_SENTENCES: usize = 3;

/// Default number of tags returned for a note.
pub const TAG_LIMIT: usize = 5;

/// Number of classification labels kept from a model response.
pub const CATEGORY_LIMIT: usize = 3;

/// Queries shorter than this (in characters) return no semantic matches.
pub const SEARCH_MIN_QUERY_CHARS: usize = 3;

/// Model similarity scores at or below this are discarded.
pub const SEARCH_MODEL_MIN_SCORE: f32 = 0.3;

/// Maximum results returned by semantic search.
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Most notes loaded as the corpus for one semantic search.
pub const SEARCH_CORPUS_MAX: usize = 500;

/// Snippet length for semantic search hits.
pub const SNIPPET_LENGTH: usize = 100;

// =============================================================================
// FALLBACK TEXT ANALYSIS
// =============================================================================

/// Tokens shorter than this are never keywords.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Number of most frequent document terms used to score sentences.
pub const TOP_TERMS: usize = 10;

/// Weight of the term-frequency component of a sentence score.
pub const FREQ_WEIGHT: f32 = 0.7;

/// Weight of the position component of a sentence score.
pub const POSITION_WEIGHT: f32 = 0.3;

/// Score bonus when the query occurs verbatim inside the document.
pub const SUBSTRING_BONUS: f32 = 0.3;

/// Confidence reported when no category keyword matches.
pub const GENERAL_CATEGORY_CONFIDENCE: f32 = 0.5;
