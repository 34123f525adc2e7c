//! Note repository over PostgREST.
//!
//! Every request carries the caller's access token so the platform's
//! row-level-security policies decide visibility. The `user_id` filter is
//! applied as well, so a misconfigured policy still cannot leak rows.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::field::Empty;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

use takenote_core::logging::{DURATION_MS, RESULT_COUNT};
use takenote_core::{
    AuthUser, CreateNoteRequest, Error, ListNotesRequest, Note, NotePage, NoteRepository, Result,
    UpdateNoteRequest,
};

use crate::client::{status_error, SupabaseClient};
use crate::escape_like;

const TABLE: &str = "notes";
const NEWEST_FIRST: &str = "created_at.desc";

/// Conditional pin updates tried before giving up.
const PIN_ATTEMPTS: u32 = 3;

/// Requests slower than this are logged at WARN.
const SLOW_QUERY_MS: u128 = 1_000;

/// Note repository backed by the Supabase `notes` table.
#[derive(Clone)]
pub struct SupabaseNoteRepository {
    client: SupabaseClient,
}

impl SupabaseNoteRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Request scoped to `user`'s rows.
    fn scoped(&self, method: Method, user: &AuthUser) -> RequestBuilder {
        self.client
            .rest(method, TABLE, Some(&user.access_token))
            .query(&[("user_id", format!("eq.{}", user.id))])
    }

    /// Request scoped to one of `user`'s notes.
    fn scoped_note(&self, method: Method, user: &AuthUser, id: Uuid, active_only: bool) -> RequestBuilder {
        let request = self
            .scoped(method, user)
            .query(&[("id", format!("eq.{}", id))]);
        if active_only {
            request.query(&[("is_deleted", "eq.false")])
        } else {
            request
        }
    }

    /// Send and decode a row set. Also returns the exact total when the
    /// request asked for `count=exact`.
    async fn rows(&self, op: &str, request: RequestBuilder) -> Result<(Vec<Note>, Option<u64>)> {
        let start = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(format!("PostgREST request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("PostgREST", status, &body));
        }

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        let notes: Vec<Note> = response
            .json()
            .await
            .map_err(|e| Error::Storage(format!("Invalid PostgREST response: {}", e)))?;

        let elapsed = start.elapsed().as_millis();
        let span = Span::current();
        span.record(DURATION_MS, elapsed as u64);
        span.record(RESULT_COUNT, notes.len() as u64);
        if elapsed > SLOW_QUERY_MS {
            warn!(op, duration_ms = elapsed as u64, slow = true, "Slow storage call");
        } else {
            debug!(op, duration_ms = elapsed as u64, result_count = notes.len(), "Storage call completed");
        }

        Ok((notes, total))
    }

    /// Send a write that returns the affected rows; none means not found.
    async fn write_one(&self, op: &str, id: Uuid, request: RequestBuilder) -> Result<Note> {
        let request = request.header("Prefer", "return=representation");
        let (notes, _) = self.rows(op, request).await?;
        notes.into_iter().next().ok_or(Error::NoteNotFound(id))
    }
}

/// Total from a `Content-Range` header such as `0-24/318` or `*/0`.
fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/').and_then(|(_, total)| total.parse().ok())
}

/// PostgREST `or` filter matching `query` in title or content.
///
/// The pattern is double-quoted so commas, dots and parentheses in user
/// input cannot alter the filter grammar. `*` is PostgREST's wildcard and is
/// dropped from the input.
fn title_or_content_filter(query: &str) -> String {
    let escaped = escape_like(&query.replace('*', ""))
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    let pattern = format!("\"*{}*\"", escaped);
    format!("(title.ilike.{},content.ilike.{})", pattern, pattern)
}

#[async_trait]
impl NoteRepository for SupabaseNoteRepository {
    #[instrument(skip(self, user, req), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "list", user_id = %user.id, page = req.page, size = req.size))]
    async fn list(&self, user: &AuthUser, req: &ListNotesRequest) -> Result<NotePage> {
        let mut request = self
            .scoped(Method::GET, user)
            .query(&[
                ("select", "*"),
                ("is_deleted", "eq.false"),
                ("order", NEWEST_FIRST),
            ])
            .query(&[("limit", u64::from(req.size)), ("offset", req.offset())])
            .header("Prefer", "count=exact");
        if let Some(search) = req.search.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.query(&[("or", title_or_content_filter(search.trim()))]);
        }

        let (notes, total) = self.rows("list", request).await?;
        let total = total.unwrap_or(req.offset() + notes.len() as u64);
        Ok(NotePage { notes, total })
    }

    #[instrument(skip(self, user, query), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "search", user_id = %user.id))]
    async fn search(&self, user: &AuthUser, query: &str, limit: u32) -> Result<Vec<Note>> {
        let request = self
            .scoped(Method::GET, user)
            .query(&[
                ("select", "*"),
                ("is_deleted", "eq.false"),
                ("order", NEWEST_FIRST),
            ])
            .query(&[("or", title_or_content_filter(query.trim()))])
            .query(&[("limit", limit)]);

        let (notes, _) = self.rows("search", request).await?;
        Ok(notes)
    }

    #[instrument(skip(self, user, req), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "insert", user_id = %user.id))]
    async fn insert(&self, user: &AuthUser, req: CreateNoteRequest) -> Result<Note> {
        let body = json!({
            "user_id": user.id,
            "title": req.title,
            "content": req.content,
            "is_pinned": req.is_pinned,
            "is_deleted": false,
        });
        let request = self
            .client
            .rest(Method::POST, TABLE, Some(&user.access_token))
            .header("Prefer", "return=representation")
            .json(&body);

        let (notes, _) = self.rows("insert", request).await?;
        notes
            .into_iter()
            .next()
            .ok_or_else(|| Error::Storage("insert returned no row".to_string()))
    }

    #[instrument(skip(self, user), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "fetch", user_id = %user.id, note_id = %id))]
    async fn fetch(&self, user: &AuthUser, id: Uuid) -> Result<Note> {
        let request = self
            .scoped_note(Method::GET, user, id, true)
            .query(&[("select", "*"), ("limit", "1")]);

        let (notes, _) = self.rows("fetch", request).await?;
        notes.into_iter().next().ok_or(Error::NoteNotFound(id))
    }

    #[instrument(skip(self, user, req), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "update", user_id = %user.id, note_id = %id))]
    async fn update(&self, user: &AuthUser, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        if req.is_empty() {
            return self.fetch(user, id).await;
        }

        let mut body = serde_json::to_value(&req)?;
        if let Value::Object(fields) = &mut body {
            fields.insert("updated_at".to_string(), json!(Utc::now()));
        }
        let request = self
            .scoped_note(Method::PATCH, user, id, true)
            .json(&body);

        self.write_one("update", id, request).await
    }

    #[instrument(skip(self, user), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "soft_delete", user_id = %user.id, note_id = %id))]
    async fn soft_delete(&self, user: &AuthUser, id: Uuid) -> Result<()> {
        let request = self
            .scoped_note(Method::PATCH, user, id, true)
            .json(&json!({ "is_deleted": true, "deleted_at": Utc::now() }));

        self.write_one("soft_delete", id, request).await.map(|_| ())
    }

    #[instrument(skip(self, user), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "restore", user_id = %user.id, note_id = %id))]
    async fn restore(&self, user: &AuthUser, id: Uuid) -> Result<()> {
        let request = self
            .scoped_note(Method::PATCH, user, id, false)
            .json(&json!({ "is_deleted": false, "deleted_at": null }));

        self.write_one("restore", id, request).await.map(|_| ())
    }

    #[instrument(skip(self, user), fields(subsystem = "db", component = "postgrest", result_count = Empty, duration_ms = Empty, op = "toggle_pin", user_id = %user.id, note_id = %id))]
    async fn toggle_pin(&self, user: &AuthUser, id: Uuid) -> Result<Note> {
        // PostgREST cannot negate a column in place. The PATCH only matches
        // while the flag still holds the value we read; an empty result means
        // another toggle landed first, so re-read and try again.
        for attempt in 1..=PIN_ATTEMPTS {
            let current = self.fetch(user, id).await?;
            let request = self
                .scoped_note(Method::PATCH, user, id, true)
                .query(&[("is_pinned", format!("eq.{}", current.is_pinned))])
                .header("Prefer", "return=representation")
                .json(&json!({ "is_pinned": !current.is_pinned, "updated_at": Utc::now() }));

            let (notes, _) = self.rows("toggle_pin", request).await?;
            if let Some(note) = notes.into_iter().next() {
                return Ok(note);
            }
            debug!(attempt, "Pin flag changed concurrently, retrying");
        }
        Err(Error::Storage(format!(
            "pin state of note {} kept changing after {} attempts",
            id, PIN_ATTEMPTS
        )))
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .rest(Method::GET, "", None)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => Ok(true),
            Ok(resp) => {
                warn!("PostgREST health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("PostgREST health check error: {}", e);
                Ok(false)
            }
        }
    }
}
