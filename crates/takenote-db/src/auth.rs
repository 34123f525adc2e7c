//! Bearer-token verification through GoTrue.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tracing::{debug, instrument, warn};

use takenote_core::{AuthUser, AuthVerifier, Error, Result};

use crate::client::{status_error, SupabaseClient};

/// Verifies access tokens by asking GoTrue who they belong to.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: SupabaseClient,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthVerifier for SupabaseAuth {
    #[instrument(skip(self, token), fields(subsystem = "auth", component = "gotrue", op = "verify"))]
    async fn verify(&self, token: &str) -> Result<AuthUser> {
        if token.trim().is_empty() {
            return Err(Error::Unauthorized("Empty bearer token".to_string()));
        }

        let response = self
            .client
            .auth(Method::GET, "user", token)
            .send()
            .await
            .map_err(|e| Error::Request(format!("Auth request failed: {}", e)))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!(%status, "Token rejected");
            return Err(Error::Unauthorized(
                "Invalid authentication credentials".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "GoTrue error");
            return Err(match status_error("GoTrue", status, &body) {
                Error::Storage(msg) => Error::Request(msg),
                other => other,
            });
        }

        let mut user: AuthUser = response
            .json()
            .await
            .map_err(|e| Error::Unauthorized(format!("Unreadable user payload: {}", e)))?;
        user.access_token = token.to_string();

        debug!(user_id = %user.id, "Token verified");
        Ok(user)
    }
}
