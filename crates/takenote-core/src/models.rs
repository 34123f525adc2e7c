//! Data models for notes, authenticated users, and AI analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A note row as stored by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Title and body joined for text analysis.
    pub fn analysis_text(&self) -> String {
        if self.title.trim().is_empty() {
            return self.content.clone();
        }
        format!("{}. {}", self.title.trim_end_matches('.'), self.content)
    }
}

/// Request for creating a new note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title (1-200 characters)
    pub title: String,
    /// Note content (1-10000 characters)
    pub content: String,
    /// Whether the note is pinned
    #[serde(default)]
    pub is_pinned: bool,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<()> {
        validate_length("title", &self.title, defaults::TITLE_MAX_CHARS)?;
        validate_length("content", &self.content, defaults::CONTENT_MAX_CHARS)
    }
}

/// Partial update of a note. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl UpdateNoteRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_length("title", title, defaults::TITLE_MAX_CHARS)?;
        }
        if let Some(content) = &self.content {
            validate_length("content", content, defaults::CONTENT_MAX_CHARS)?;
        }
        Ok(())
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_pinned.is_none()
    }
}

/// Paging parameters for listing a user's notes.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesRequest {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Notes per page (1-100)
    #[serde(default = "default_size")]
    pub size: u32,
    /// Optional title/content search
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> u32 {
    defaults::PAGE_FIRST
}

fn default_size() -> u32 {
    defaults::PAGE_SIZE
}

impl Default for ListNotesRequest {
    fn default() -> Self {
        Self {
            page: defaults::PAGE_FIRST,
            size: defaults::PAGE_SIZE,
            search: None,
        }
    }
}

impl ListNotesRequest {
    pub fn validate(&self) -> Result<()> {
        if self.page < defaults::PAGE_FIRST {
            return Err(Error::InvalidInput("page must be >= 1".into()));
        }
        validate_page_size(self.size)?;
        if let Some(search) = &self.search {
            validate_length("search", search, defaults::QUERY_MAX_CHARS)?;
        }
        Ok(())
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }
}

/// Title/content search request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchNotesRequest {
    /// Search query (1-100 characters)
    pub query: String,
    /// Maximum number of results (1-100)
    #[serde(default = "default_size")]
    pub limit: u32,
}

impl SearchNotesRequest {
    pub fn validate(&self) -> Result<()> {
        validate_length("query", &self.query, defaults::QUERY_MAX_CHARS)?;
        validate_page_size(self.limit)
    }
}

/// A page of notes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteListResponse {
    pub notes: Vec<Note>,
    /// Total number of notes matching, across all pages
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

/// A page of notes as returned by the repository, before response shaping.
#[derive(Debug, Clone, Default)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub total: u64,
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    if len > max {
        return Err(Error::InvalidInput(format!(
            "{} must be at most {} characters (got {})",
            field, max, len
        )));
    }
    Ok(())
}

fn validate_page_size(size: u32) -> Result<()> {
    if size == 0 || size > defaults::PAGE_SIZE_MAX {
        return Err(Error::InvalidInput(format!(
            "size must be between 1 and {}",
            defaults::PAGE_SIZE_MAX
        )));
    }
    Ok(())
}

// =============================================================================
// AUTH TYPES
// =============================================================================

/// Caller identity established by the auth platform.
///
/// Carries the bearer token so storage calls run under the caller's
/// row-level-security policies.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub access_token: String,
}

impl std::fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Public view of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&AuthUser> for UserInfo {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

/// Generic success response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// =============================================================================
// AI ANALYSIS TYPES
// =============================================================================

/// A label with a model or heuristic confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f32,
}

/// Note summary with provenance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummaryResult {
    pub summary: String,
    /// Model that produced the summary, or the fallback name
    pub model: String,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_ratio: f32,
    /// True when the heuristic fallback produced this result
    pub fallback: bool,
}

impl SummaryResult {
    pub fn new(original: &str, summary: String, model: impl Into<String>, fallback: bool) -> Self {
        let original_length = original.chars().count();
        let summary_length = summary.chars().count();
        let compression_ratio = if original_length > 0 {
            summary_length as f32 / original_length as f32
        } else {
            1.0
        };
        Self {
            summary,
            model: model.into(),
            original_length,
            summary_length,
            compression_ratio,
            fallback,
        }
    }
}

/// Tags extracted from a note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagResult {
    pub tags: Vec<String>,
    pub confidence_scores: Vec<f32>,
    pub model: String,
    pub fallback: bool,
}

/// Categories assigned to a note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResult {
    pub categories: Vec<String>,
    pub confidence_scores: Vec<f32>,
    pub model: String,
    pub fallback: bool,
}

/// Summary, tags and categories computed together.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteAnalysis {
    pub summary: SummaryResult,
    pub tags: TagResult,
    pub category: CategoryResult,
    pub processed_at: DateTime<Utc>,
}

/// Semantic search request over the caller's notes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SemanticSearchRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// One semantic search match.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SemanticHit {
    pub note_id: Uuid,
    pub title: String,
    pub similarity_score: f32,
    pub snippet: String,
}

/// Ranked semantic search matches.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SemanticSearchResponse {
    pub query: String,
    pub results: Vec<SemanticHit>,
    /// Matches before truncation to the result limit
    pub total_matches: usize,
    pub model: String,
    pub fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, content: &str) -> Note {
        Note {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            title: title.to_string(),
            content: content.to_string(),
            is_pinned: false,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_create_request_valid() {
        let req = CreateNoteRequest {
            title: "Groceries".into(),
            content: "Milk and eggs".into(),
            is_pinned: false,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_empty_title() {
        let req = CreateNoteRequest {
            title: "   ".into(),
            content: "body".into(),
            is_pinned: false,
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_create_request_rejects_long_title() {
        let req = CreateNoteRequest {
            title: "x".repeat(defaults::TITLE_MAX_CHARS + 1),
            content: "body".into(),
            is_pinned: false,
        };
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_title_limit_counts_chars_not_bytes() {
        // 200 multi-byte characters is still within bounds
        let req = CreateNoteRequest {
            title: "ş".repeat(defaults::TITLE_MAX_CHARS),
            content: "içerik".into(),
            is_pinned: false,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_long_content() {
        let req = CreateNoteRequest {
            title: "t".into(),
            content: "y".repeat(defaults::CONTENT_MAX_CHARS + 1),
            is_pinned: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_pinned_defaults_false() {
        let req: CreateNoteRequest =
            serde_json::from_str(r#"{"title":"a","content":"b"}"#).unwrap();
        assert!(!req.is_pinned);
    }

    #[test]
    fn test_update_request_partial_validation() {
        let req = UpdateNoteRequest {
            title: None,
            content: Some(String::new()),
            is_pinned: None,
        };
        assert!(req.validate().is_err());

        let req = UpdateNoteRequest {
            is_pinned: Some(true),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        assert!(!req.is_empty());
        assert!(UpdateNoteRequest::default().is_empty());
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let req = UpdateNoteRequest {
            title: Some("New".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New"}));
    }

    #[test]
    fn test_list_request_offset() {
        let req = ListNotesRequest {
            page: 3,
            size: 20,
            search: None,
        };
        assert_eq!(req.offset(), 40);
        assert_eq!(ListNotesRequest::default().offset(), 0);
    }

    #[test]
    fn test_list_request_bounds() {
        let mut req = ListNotesRequest::default();
        assert!(req.validate().is_ok());
        req.page = 0;
        assert!(req.validate().is_err());
        req.page = 1;
        req.size = 101;
        assert!(req.validate().is_err());
        req.size = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_search_request_default_limit() {
        let req: SearchNotesRequest = serde_json::from_str(r#"{"query":"cat"}"#).unwrap();
        assert_eq!(req.limit, defaults::PAGE_SIZE);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_search_request_rejects_long_query() {
        let req = SearchNotesRequest {
            query: "q".repeat(defaults::QUERY_MAX_CHARS + 1),
            limit: 10,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_note_analysis_text_joins_title_and_body() {
        assert_eq!(
            note("Shopping", "Buy milk.").analysis_text(),
            "Shopping. Buy milk."
        );
        assert_eq!(note("Done.", "x").analysis_text(), "Done. x");
        assert_eq!(note("", "Only body").analysis_text(), "Only body");
    }

    #[test]
    fn test_note_deserializes_platform_row() {
        let row = serde_json::json!({
            "id": "6f1c8f1e-9b7a-4c53-a1b4-0d2f6f3b8a11",
            "user_id": "1b0e7c9a-3d2f-4e8b-9a6c-5f4d3e2c1b0a",
            "title": "Test Note",
            "content": "This is a test note content",
            "is_pinned": false,
            "is_deleted": false,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": null,
            "deleted_at": null
        });
        let note: Note = serde_json::from_value(row).unwrap();
        assert_eq!(note.title, "Test Note");
        assert!(note.updated_at.is_none());
    }

    #[test]
    fn test_auth_user_debug_redacts_token() {
        let user = AuthUser {
            id: Uuid::nil(),
            email: Some("a@example.com".into()),
            created_at: None,
            access_token: "secret-token".into(),
        };
        let debug = format!("{:?}", user);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_summary_result_ratio() {
        let r = SummaryResult::new("abcdefghij", "abcde".into(), "m", false);
        assert_eq!(r.original_length, 10);
        assert_eq!(r.summary_length, 5);
        assert!((r.compression_ratio - 0.5).abs() < f32::EPSILON);

        let empty = SummaryResult::new("", String::new(), "m", true);
        assert_eq!(empty.compression_ratio, 1.0);
    }
}
