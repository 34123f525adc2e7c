//! In-process stand-ins for the platform.
//!
//! [`MemoryNoteRepository`] follows the same visibility rules as the
//! PostgREST repository (owner only, active rows only where required), so
//! handler tests exercise real semantics without a network.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use takenote_core::{
    AuthUser, AuthVerifier, CreateNoteRequest, Error, ListNotesRequest, Note, NotePage,
    NoteRepository, Result, UpdateNoteRequest,
};

/// Note repository held in memory.
#[derive(Default)]
pub struct MemoryNoteRepository {
    /// Insertion order is kept so equal timestamps still list newest first.
    notes: RwLock<Vec<Note>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active notes of `user`, newest first, optionally filtered by `query`.
    async fn visible(&self, user: &AuthUser, query: Option<&str>) -> Vec<Note> {
        let needle = query.map(|q| q.trim().to_lowercase());
        let notes = self.notes.read().await;
        let mut found: Vec<Note> = notes
            .iter()
            .rev()
            .filter(|n| n.user_id == user.id && !n.is_deleted)
            .filter(|n| match &needle {
                Some(q) => {
                    n.title.to_lowercase().contains(q.as_str())
                        || n.content.to_lowercase().contains(q.as_str())
                }
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    /// Apply `change` to one of `user`'s notes.
    async fn modify<F>(&self, user: &AuthUser, id: Uuid, active_only: bool, change: F) -> Result<Note>
    where
        F: FnOnce(&mut Note),
    {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user.id && (!active_only || !n.is_deleted))
            .ok_or(Error::NoteNotFound(id))?;
        change(note);
        Ok(note.clone())
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self, user: &AuthUser, req: &ListNotesRequest) -> Result<NotePage> {
        let query = req.search.as_deref().filter(|s| !s.trim().is_empty());
        let all = self.visible(user, query).await;
        let total = all.len() as u64;
        let offset = usize::try_from(req.offset()).unwrap_or(usize::MAX);
        let notes = all.into_iter().skip(offset).take(req.size as usize).collect();
        Ok(NotePage { notes, total })
    }

    async fn search(&self, user: &AuthUser, query: &str, limit: u32) -> Result<Vec<Note>> {
        let mut found = self.visible(user, Some(query)).await;
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn insert(&self, user: &AuthUser, req: CreateNoteRequest) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            user_id: user.id,
            title: req.title,
            content: req.content,
            is_pinned: req.is_pinned,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn fetch(&self, user: &AuthUser, id: Uuid) -> Result<Note> {
        self.notes
            .read()
            .await
            .iter()
            .find(|n| n.id == id && n.user_id == user.id && !n.is_deleted)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update(&self, user: &AuthUser, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        if req.is_empty() {
            return self.fetch(user, id).await;
        }
        self.modify(user, id, true, |note| {
            if let Some(title) = req.title {
                note.title = title;
            }
            if let Some(content) = req.content {
                note.content = content;
            }
            if let Some(pinned) = req.is_pinned {
                note.is_pinned = pinned;
            }
            note.updated_at = Some(Utc::now());
        })
        .await
    }

    async fn soft_delete(&self, user: &AuthUser, id: Uuid) -> Result<()> {
        self.modify(user, id, true, |note| {
            note.is_deleted = true;
            note.deleted_at = Some(Utc::now());
        })
        .await
        .map(|_| ())
    }

    async fn restore(&self, user: &AuthUser, id: Uuid) -> Result<()> {
        self.modify(user, id, false, |note| {
            note.is_deleted = false;
            note.deleted_at = None;
        })
        .await
        .map(|_| ())
    }

    async fn toggle_pin(&self, user: &AuthUser, id: Uuid) -> Result<Note> {
        self.modify(user, id, true, |note| {
            note.is_pinned = !note.is_pinned;
            note.updated_at = Some(Utc::now());
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Token verifier with a fixed token table.
#[derive(Default)]
pub struct StaticTokenVerifier {
    users: HashMap<String, AuthUser>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `user`.
    pub fn with_user(mut self, token: impl Into<String>, mut user: AuthUser) -> Self {
        let token = token.into();
        user.access_token = token.clone();
        self.users.insert(token, user);
        self
    }
}

#[async_trait]
impl AuthVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser> {
        self.users
            .get(token)
            .cloned()
            .ok_or_else(|| Error::Unauthorized("Invalid authentication credentials".to_string()))
    }
}
