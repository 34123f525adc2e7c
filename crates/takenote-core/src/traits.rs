//! Core traits for takenote abstractions.
//!
//! These traits are the contracts for the external platform: the auth service
//! that verifies bearer tokens, the datastore that holds notes under
//! row-level security, and the hosted models used for text analysis.
//! Concrete bindings live in `takenote-db` and `takenote-inference`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// AUTH TRAITS
// =============================================================================

/// Verifies bearer tokens against the identity platform.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    ///
    /// Returns `Error::Unauthorized` for unknown, expired or malformed tokens.
    async fn verify(&self, token: &str) -> Result<AuthUser>;
}

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD operations.
///
/// Every call is scoped to `user`; implementations never return another
/// user's notes and treat them as not found.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List active notes, newest first.
    async fn list(&self, user: &AuthUser, req: &ListNotesRequest) -> Result<NotePage>;

    /// Active notes whose title or content contains `query` (case-insensitive),
    /// newest first.
    async fn search(&self, user: &AuthUser, query: &str, limit: u32) -> Result<Vec<Note>>;

    /// Insert a new note owned by `user`.
    async fn insert(&self, user: &AuthUser, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch an active note by ID.
    async fn fetch(&self, user: &AuthUser, id: Uuid) -> Result<Note>;

    /// Apply a partial update to an active note.
    async fn update(&self, user: &AuthUser, id: Uuid, req: UpdateNoteRequest) -> Result<Note>;

    /// Soft-delete an active note.
    async fn soft_delete(&self, user: &AuthUser, id: Uuid) -> Result<()>;

    /// Clear the soft-delete flag.
    async fn restore(&self, user: &AuthUser, id: Uuid) -> Result<()>;

    /// Flip the pinned flag and return the updated note.
    async fn toggle_pin(&self, user: &AuthUser, id: Uuid) -> Result<Note>;

    /// Check that the datastore is reachable.
    async fn health_check(&self) -> Result<bool>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Hosted model backend for note analysis.
///
/// Every method may fail; callers are expected to fall back to the
/// heuristics in [`crate::text`].
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Abstractive summary of `text`. Returns the summary and the model used.
    async fn summarize(&self, text: &str) -> Result<(String, String)>;

    /// Named entities found in `text`, best first. Returns entities and the model used.
    async fn extract_entities(&self, text: &str) -> Result<(Vec<ScoredLabel>, String)>;

    /// Classification labels for `text`, best first. Returns labels and the model used.
    async fn classify(&self, text: &str) -> Result<(Vec<ScoredLabel>, String)>;

    /// Similarity of `query` to each of `documents`, index-aligned.
    /// Returns scores and the model used.
    async fn sentence_similarity(
        &self,
        query: &str,
        documents: &[String],
    ) -> Result<(Vec<f32>, String)>;

    /// Backend identifier for logs and health output.
    fn name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
