//! Note CRUD handlers.
//!
//! Every handler runs as the authenticated caller; the repository scopes
//! reads and writes to that user, so another user's note is a 404.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use takenote_core::{
    CreateNoteRequest, ErrorResponse, ListNotesRequest, Note, NoteListResponse,
    SearchNotesRequest, SuccessResponse, UpdateNoteRequest,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// List the caller's active notes, newest first.
#[utoipa::path(get, path = "/notes", tag = "Notes",
    params(ListNotesRequest),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page of notes", body = NoteListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "Invalid paging parameters", body = ErrorResponse)))]
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(req): ApiQuery<ListNotesRequest>,
) -> Result<Json<NoteListResponse>, ApiError> {
    req.validate()?;
    let page = state.notes.list(&user, &req).await?;
    Ok(Json(NoteListResponse {
        notes: page.notes,
        total: page.total,
        page: req.page,
        size: req.size,
    }))
}

/// Create a note.
#[utoipa::path(post, path = "/notes", tag = "Notes",
    request_body = CreateNoteRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created", body = Note),
        (status = 422, description = "Invalid title or content", body = ErrorResponse)))]
pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    req.validate()?;
    let note = state.notes.insert(&user, req).await?;
    info!(note_id = %note.id, user_id = %user.id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// Search the caller's notes by title or content.
#[utoipa::path(post, path = "/notes/search", tag = "Notes",
    request_body = SearchNotesRequest,
    security(("bearer" = [])),
    responses((status = 200, description = "Matching notes", body = NoteListResponse)))]
pub async fn search_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<SearchNotesRequest>,
) -> Result<Json<NoteListResponse>, ApiError> {
    req.validate()?;
    let notes = state.notes.search(&user, req.query.trim(), req.limit).await?;
    let count = notes.len() as u32;
    Ok(Json(NoteListResponse {
        notes,
        total: u64::from(count),
        page: 1,
        size: count,
    }))
}

#[utoipa::path(get, path = "/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)))]
pub async fn get_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.fetch(&user, id).await?))
}

/// Partially update a note. Omitted fields keep their values.
#[utoipa::path(put, path = "/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note ID")),
    request_body = UpdateNoteRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)))]
pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    req.validate()?;
    let note = state.notes.update(&user, id, req).await?;
    info!(note_id = %id, "Note updated");
    Ok(Json(note))
}

/// Soft-delete a note. It can be brought back with `/restore`.
#[utoipa::path(delete, path = "/notes/{id}", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.notes.soft_delete(&user, id).await?;
    info!(note_id = %id, "Note deleted");
    Ok(Json(SuccessResponse {
        message: format!("Note {} deleted successfully", id),
        data: Some(json!({ "note_id": id })),
    }))
}

#[utoipa::path(post, path = "/notes/{id}/restore", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Restored", body = SuccessResponse),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn restore_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.notes.restore(&user, id).await?;
    info!(note_id = %id, "Note restored");
    Ok(Json(SuccessResponse {
        message: format!("Note {} restored successfully", id),
        data: Some(json!({ "note_id": id })),
    }))
}

#[utoipa::path(patch, path = "/notes/{id}/pin", tag = "Notes",
    params(("id" = Uuid, Path, description = "Note ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Note with the flipped pin flag", body = Note),
        (status = 404, description = "Not found", body = ErrorResponse)))]
pub async fn toggle_pin(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Note>, ApiError> {
    let note = state.notes.toggle_pin(&user, id).await?;
    info!(note_id = %id, pinned = note.is_pinned, "Note pin toggled");
    Ok(Json(note))
}
