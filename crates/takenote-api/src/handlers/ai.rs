//! AI analysis handlers.
//!
//! These never fail because of the model backend: `AiService` answers with
//! the heuristic fallback and says so in the `fallback` and `model` fields.
//! Errors come only from auth, lookup and validation.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use takenote_core::defaults::{
    PAGE_FIRST, PAGE_SIZE_MAX, QUERY_MAX_CHARS, SEARCH_CORPUS_MAX, SUMMARY_SENTENCES, TAG_LIMIT,
};
use takenote_core::{
    clamp_count, AuthUser, CategoryResult, ErrorResponse, ListNotesRequest, Note, NoteAnalysis,
    SemanticSearchRequest, SemanticSearchResponse, SummaryResult, TagResult,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    /// Sentences in a fallback summary (negative is treated as zero)
    pub sentences: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TagParams {
    /// Maximum number of tags (negative is treated as zero)
    pub limit: Option<i64>,
}

/// Summarize a note.
#[utoipa::path(post, path = "/notes/{id}/ai/summary", tag = "AI",
    params(("id" = Uuid, Path, description = "Note ID"), SummaryParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Summary", body = SummaryResult),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn summarize_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<Json<SummaryResult>, ApiError> {
    let note = state.notes.fetch(&user, id).await?;
    let sentences = params.sentences.map_or(SUMMARY_SENTENCES, clamp_count);
    let result = state.ai.summarize(&note.analysis_text(), sentences).await;
    info!(note_id = %id, model = %result.model, fallback = result.fallback, "Note summarized");
    Ok(Json(result))
}

/// Suggest tags for a note.
#[utoipa::path(post, path = "/notes/{id}/ai/tags", tag = "AI",
    params(("id" = Uuid, Path, description = "Note ID"), TagParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Tags", body = TagResult),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn tag_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<TagParams>,
) -> Result<Json<TagResult>, ApiError> {
    let note = state.notes.fetch(&user, id).await?;
    let limit = params.limit.map_or(TAG_LIMIT, clamp_count);
    let result = state.ai.generate_tags(&note.analysis_text(), limit).await;
    info!(note_id = %id, model = %result.model, tags = result.tags.len(), "Note tagged");
    Ok(Json(result))
}

#[utoipa::path(post, path = "/notes/{id}/ai/category", tag = "AI",
    params(("id" = Uuid, Path, description = "Note ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Categories", body = CategoryResult),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn categorize_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CategoryResult>, ApiError> {
    let note = state.notes.fetch(&user, id).await?;
    Ok(Json(state.ai.categorize(&note.analysis_text()).await))
}

/// Summary, tags and categories in one call, computed concurrently.
#[utoipa::path(post, path = "/notes/{id}/ai/process", tag = "AI",
    params(("id" = Uuid, Path, description = "Note ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Full analysis", body = NoteAnalysis),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn process_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<NoteAnalysis>, ApiError> {
    let note = state.notes.fetch(&user, id).await?;
    Ok(Json(state.ai.process_note(&note).await))
}

/// Rank the caller's notes by similarity to a free-text query.
#[utoipa::path(post, path = "/notes/ai/search", tag = "AI",
    request_body = SemanticSearchRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Ranked matches", body = SemanticSearchResponse),
        (status = 422, description = "Query too long", body = ErrorResponse)))]
pub async fn semantic_search(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<SemanticSearchRequest>,
) -> Result<Json<SemanticSearchResponse>, ApiError> {
    let query_len = req.query.chars().count();
    if query_len > QUERY_MAX_CHARS {
        return Err(ApiError::Validation(format!(
            "query must be at most {} characters (got {})",
            QUERY_MAX_CHARS, query_len
        )));
    }
    if req.limit.is_some_and(|l| l > PAGE_SIZE_MAX) {
        return Err(ApiError::Validation(format!(
            "limit must be at most {}",
            PAGE_SIZE_MAX
        )));
    }

    let corpus = load_corpus(&state, &user).await?;
    let response = state
        .ai
        .semantic_search(req.query.trim(), &corpus, req.limit.map(|l| l as usize))
        .await;
    info!(
        user_id = %user.id,
        corpus = corpus.len(),
        result_count = response.results.len(),
        model = %response.model,
        "Semantic search completed"
    );
    Ok(Json(response))
}

/// The caller's active notes, newest first, up to `SEARCH_CORPUS_MAX`.
async fn load_corpus(state: &AppState, user: &AuthUser) -> Result<Vec<Note>, ApiError> {
    let mut req = ListNotesRequest {
        page: PAGE_FIRST,
        size: PAGE_SIZE_MAX,
        search: None,
    };
    let mut notes = Vec::new();
    loop {
        let page = state.notes.list(user, &req).await?;
        let fetched = page.notes.len();
        notes.extend(page.notes);
        if fetched < req.size as usize
            || notes.len() as u64 >= page.total
            || notes.len() >= SEARCH_CORPUS_MAX
        {
            break;
        }
        req.page += 1;
    }
    notes.truncate(SEARCH_CORPUS_MAX);
    Ok(notes)
}
