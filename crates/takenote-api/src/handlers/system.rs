//! Service info, health and identity handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use takenote_core::{SuccessResponse, UserInfo};

use crate::auth::CurrentUser;
use crate::state::AppState;

#[utoipa::path(get, path = "/", tag = "System",
    responses((status = 200, description = "API information", body = SuccessResponse)))]
pub async fn root(State(state): State<AppState>) -> Json<SuccessResponse> {
    let settings = &state.settings;
    Json(SuccessResponse {
        message: format!("{} is running", settings.app_name),
        data: Some(json!({
            "version": settings.app_version,
            "docs_url": settings.docs_url(),
        })),
    })
}

/// Health check. 503 when the datastore is unreachable.
#[utoipa::path(get, path = "/health", tag = "System",
    responses(
        (status = 200, description = "Healthy"),
        (status = 503, description = "Datastore unreachable")))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let ai_backend = state.ai.backend_name().unwrap_or("fallback").to_string();
    match state.notes.health_check().await {
        Ok(true) => Json(json!({
            "status": "healthy",
            "database": "connected",
            "ai_backend": ai_backend,
            "version": state.settings.app_version,
        }))
        .into_response(),
        Ok(false) => unhealthy("datastore did not respond"),
        Err(e) => {
            error!(error = %e, "Health check failed");
            unhealthy("datastore health check failed")
        }
    }
}

fn unhealthy(reason: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "unhealthy",
            "database": "disconnected",
            "error": reason,
        })),
    )
        .into_response()
}

/// The authenticated caller.
#[utoipa::path(get, path = "/me", tag = "System",
    security(("bearer" = [])),
    responses((status = 200, description = "Current user", body = UserInfo)))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(UserInfo::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use takenote_core::{
        AuthUser, CreateNoteRequest, Error, ListNotesRequest, Note, NotePage, NoteRepository,
        Result, UpdateNoteRequest,
    };
    use takenote_db::StaticTokenVerifier;
    use takenote_inference::AiService;
    use uuid::Uuid;

    use crate::config::Settings;

    const UPSTREAM_BODY: &str = "PostgREST returned 500: relation \"notes\" does not exist";

    /// Store whose every call fails with a platform error.
    struct BrokenStore;

    #[axum::async_trait]
    impl NoteRepository for BrokenStore {
        async fn list(&self, _: &AuthUser, _: &ListNotesRequest) -> Result<NotePage> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn search(&self, _: &AuthUser, _: &str, _: u32) -> Result<Vec<Note>> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn insert(&self, _: &AuthUser, _: CreateNoteRequest) -> Result<Note> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn fetch(&self, _: &AuthUser, _: Uuid) -> Result<Note> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn update(&self, _: &AuthUser, _: Uuid, _: UpdateNoteRequest) -> Result<Note> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn soft_delete(&self, _: &AuthUser, _: Uuid) -> Result<()> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn restore(&self, _: &AuthUser, _: Uuid) -> Result<()> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn toggle_pin(&self, _: &AuthUser, _: Uuid) -> Result<Note> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
        async fn health_check(&self) -> Result<bool> {
            Err(Error::Storage(UPSTREAM_BODY.into()))
        }
    }

    #[tokio::test]
    async fn test_health_failure_hides_platform_error() {
        let state = AppState::new(
            Arc::new(BrokenStore),
            Arc::new(StaticTokenVerifier::new()),
            AiService::disabled(),
            Settings::default(),
        );

        let response = health_check(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["error"], "datastore health check failed");
        assert!(!String::from_utf8_lossy(&bytes).contains("PostgREST"));
    }
}
