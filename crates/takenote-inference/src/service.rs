//! AI orchestration with heuristic fallback.
//!
//! [`AiService`] is the only caller of an [`AnalysisBackend`]. Every backend
//! call is bounded by a timeout, and any failure, timeout or missing backend
//! is answered by the matching heuristic from `takenote_core::text`. Callers
//! therefore never see an inference error.

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::field::Empty;
use tracing::{debug, instrument, warn, Span};

use takenote_core::defaults::{
    CATEGORY_LIMIT, CLASSIFY_INPUT_CHARS, SEARCH_MIN_QUERY_CHARS, SEARCH_MODEL_MIN_SCORE,
    SEARCH_RESULT_LIMIT, SIMILARITY_INPUT_CHARS, SNIPPET_LENGTH, SUMMARY_INPUT_CHARS,
    SUMMARY_MIN_INPUT_CHARS, SUMMARY_SENTENCES, TAG_LIMIT, TAG_MIN_INPUT_CHARS,
};
use takenote_core::logging::FALLBACK;
use takenote_core::{
    categorize, keyword_frequencies, similarity, summarize, truncate_chars, AnalysisBackend,
    CategoryResult, Note, NoteAnalysis, Result, SemanticHit, SemanticSearchResponse,
    SummaryResult, TagResult,
};

/// Model names reported when no external model answered.
pub mod fallback_model {
    pub const PASSTHROUGH: &str = "passthrough_short_content";
    pub const SENTENCE_SCORING: &str = "fallback_sentence_scoring";
    pub const KEYWORDS: &str = "fallback_keywords";
    pub const RULES: &str = "fallback_rules";
    pub const LEXICAL: &str = "lexical_similarity";
    pub const SHORT_QUERY: &str = "short_query";
}

/// Note analysis backed by an optional hosted model.
#[derive(Clone)]
pub struct AiService {
    backend: Option<Arc<dyn AnalysisBackend>>,
    timeout: Duration,
}

impl AiService {
    pub fn new(backend: Arc<dyn AnalysisBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    /// Service that always answers with the heuristics.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// Whether the hosted backend answers. `false` when disabled.
    pub async fn health_check(&self) -> bool {
        match &self.backend {
            Some(backend) => matches!(
                tokio::time::timeout(self.timeout, backend.health_check()).await,
                Ok(Ok(true))
            ),
            None => false,
        }
    }

    /// Await a backend call under the timeout. `None` means use the fallback.
    async fn guarded<T>(&self, op: &'static str, call: impl Future<Output = Result<T>>) -> Option<T> {
        let start = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, call).await;
        Span::current().record(FALLBACK, !matches!(outcome, Ok(Ok(_))));
        match outcome {
            Ok(Ok(value)) => {
                debug!(
                    subsystem = "inference",
                    component = "ai_service",
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Model answered"
                );
                Some(value)
            }
            Ok(Err(e)) => {
                warn!(
                    subsystem = "inference",
                    component = "ai_service",
                    op,
                    error = %e,
                    fallback = true,
                    "Model call failed, using fallback"
                );
                None
            }
            Err(_) => {
                warn!(
                    subsystem = "inference",
                    component = "ai_service",
                    op,
                    timeout_secs = self.timeout.as_secs(),
                    fallback = true,
                    "Model call timed out, using fallback"
                );
                None
            }
        }
    }

    /// Summarize `text`. The fallback keeps the `sentences` best sentences.
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "ai_service", op = "summarize", fallback = Empty, input_len = text.len()))]
    pub async fn summarize(&self, text: &str, sentences: usize) -> SummaryResult {
        if text.trim().chars().count() < SUMMARY_MIN_INPUT_CHARS {
            return SummaryResult::new(
                text,
                text.trim().to_string(),
                fallback_model::PASSTHROUGH,
                false,
            );
        }

        if let Some(backend) = &self.backend {
            let input = truncate_chars(text, SUMMARY_INPUT_CHARS);
            if let Some((summary, model)) =
                self.guarded("summarize", backend.summarize(input)).await
            {
                return SummaryResult::new(text, summary, model, false);
            }
        }

        let picked = summarize(text, sentences);
        let summary = if picked.is_empty() {
            text.trim().to_string()
        } else {
            picked.join(" ")
        };
        SummaryResult::new(text, summary, fallback_model::SENTENCE_SCORING, true)
    }

    /// Up to `limit` tags for `text`.
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "ai_service", op = "generate_tags", fallback = Empty, input_len = text.len()))]
    pub async fn generate_tags(&self, text: &str, limit: usize) -> TagResult {
        if let Some(backend) = &self.backend {
            if text.trim().chars().count() >= TAG_MIN_INPUT_CHARS {
                let input = truncate_chars(text, CLASSIFY_INPUT_CHARS);
                if let Some((entities, model)) = self
                    .guarded("extract_entities", backend.extract_entities(input))
                    .await
                {
                    let mut tags = Vec::new();
                    let mut scores = Vec::new();
                    for entity in entities {
                        if tags.len() == limit {
                            break;
                        }
                        if !tags.contains(&entity.label) {
                            tags.push(entity.label);
                            scores.push(entity.score);
                        }
                    }
                    return TagResult {
                        tags,
                        confidence_scores: scores,
                        model,
                        fallback: false,
                    };
                }
            }
        }

        let frequencies = keyword_frequencies(text);
        let total: usize = frequencies.iter().map(|(_, count)| count).sum();
        let (tags, confidence_scores) = frequencies
            .into_iter()
            .take(limit)
            .map(|(term, count)| (term, count as f32 / total.max(1) as f32))
            .unzip();
        TagResult {
            tags,
            confidence_scores,
            model: fallback_model::KEYWORDS.to_string(),
            fallback: true,
        }
    }

    /// Categories for `text`, best first.
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "ai_service", op = "categorize", fallback = Empty, input_len = text.len()))]
    pub async fn categorize(&self, text: &str) -> CategoryResult {
        if let Some(backend) = &self.backend {
            let input = truncate_chars(text, CLASSIFY_INPUT_CHARS);
            if let Some((labels, model)) = self.guarded("classify", backend.classify(input)).await {
                let (categories, confidence_scores) = labels
                    .into_iter()
                    .take(CATEGORY_LIMIT)
                    .map(|l| (l.label, l.score))
                    .unzip();
                return CategoryResult {
                    categories,
                    confidence_scores,
                    model,
                    fallback: false,
                };
            }
        }

        let (categories, confidence_scores) =
            categorize(text).into_iter().map(|l| (l.label, l.score)).unzip();
        CategoryResult {
            categories,
            confidence_scores,
            model: fallback_model::RULES.to_string(),
            fallback: true,
        }
    }

    /// Rank `notes` by similarity to `query`, best first.
    ///
    /// Model scores at or below `SEARCH_MODEL_MIN_SCORE` are dropped; if the
    /// model keeps nothing, the lexical matcher decides instead.
    #[instrument(skip(self, query, notes), fields(subsystem = "inference", component = "ai_service", op = "semantic_search", fallback = Empty, note_count = notes.len()))]
    pub async fn semantic_search(
        &self,
        query: &str,
        notes: &[Note],
        limit: Option<usize>,
    ) -> SemanticSearchResponse {
        let limit = limit.unwrap_or(SEARCH_RESULT_LIMIT);
        if query.trim().chars().count() < SEARCH_MIN_QUERY_CHARS {
            return SemanticSearchResponse {
                query: query.to_string(),
                results: Vec::new(),
                total_matches: 0,
                model: fallback_model::SHORT_QUERY.to_string(),
                fallback: false,
            };
        }

        let texts: Vec<String> = notes.iter().map(Note::analysis_text).collect();

        if let (Some(backend), false) = (&self.backend, notes.is_empty()) {
            let documents: Vec<String> = texts
                .iter()
                .map(|t| truncate_chars(t, SIMILARITY_INPUT_CHARS).to_string())
                .collect();
            if let Some((scores, model)) = self
                .guarded(
                    "sentence_similarity",
                    backend.sentence_similarity(query, &documents),
                )
                .await
            {
                let scored: Vec<(usize, f32)> = scores
                    .into_iter()
                    .enumerate()
                    .filter(|(_, s)| *s > SEARCH_MODEL_MIN_SCORE)
                    .collect();
                if !scored.is_empty() {
                    return rank(query, notes, scored, limit, model, false);
                }
                debug!(model = %model, "No model match above threshold, trying lexical");
            }
        }

        let scored: Vec<(usize, f32)> = texts
            .iter()
            .map(|t| similarity(query, t))
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .collect();
        rank(
            query,
            notes,
            scored,
            limit,
            fallback_model::LEXICAL.to_string(),
            true,
        )
    }

    /// Summary, tags and categories computed concurrently.
    #[instrument(skip(self, note), fields(subsystem = "inference", component = "ai_service", op = "process_note", note_id = %note.id))]
    pub async fn process_note(&self, note: &Note) -> NoteAnalysis {
        let text = note.analysis_text();
        let (summary, tags, category) = tokio::join!(
            self.summarize(&text, SUMMARY_SENTENCES),
            self.generate_tags(&text, TAG_LIMIT),
            self.categorize(&text),
        );
        NoteAnalysis {
            summary,
            tags,
            category,
            processed_at: Utc::now(),
        }
    }
}

fn snippet(content: &str) -> String {
    let cut = truncate_chars(content, SNIPPET_LENGTH);
    if cut.len() < content.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

fn rank(
    query: &str,
    notes: &[Note],
    mut scored: Vec<(usize, f32)>,
    limit: usize,
    model: String,
    fallback: bool,
) -> SemanticSearchResponse {
    // stable: equal scores keep note order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let total_matches = scored.len();
    let results = scored
        .into_iter()
        .take(limit)
        .filter_map(|(i, score)| {
            notes.get(i).map(|note| SemanticHit {
                note_id: note.id,
                title: note.title.clone(),
                similarity_score: score,
                snippet: snippet(&note.content),
            })
        })
        .collect();

    SemanticSearchResponse {
        query: query.to_string(),
        results,
        total_matches,
        model,
        fallback,
    }
}
