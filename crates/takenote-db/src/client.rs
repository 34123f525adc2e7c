//! Shared Supabase HTTP client.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::info;

use takenote_core::defaults::PLATFORM_TIMEOUT_SECS;
use takenote_core::{Error, Result};

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anon (public) API key sent as `apikey`
    pub key: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            timeout_secs: PLATFORM_TIMEOUT_SECS,
        }
    }

    /// Read `SUPABASE_URL`, `SUPABASE_KEY` and `SUPABASE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let url = non_empty_env("SUPABASE_URL")?;
        let key = non_empty_env("SUPABASE_KEY")?;
        let mut config = Self::new(url, key);
        if let Some(secs) = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Ok(config)
    }
}

fn non_empty_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} is not set", name)))
}

/// HTTP client bound to one Supabase project.
///
/// Cheap to clone; the connection pool is shared.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(url = %config.url, "Initializing Supabase client");

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Request against PostgREST (`/rest/v1/{table}`).
    ///
    /// `token` is the caller's access token; without one the anon key is
    /// used as bearer.
    pub(crate) fn rest(&self, method: Method, table: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.config.url, table);
        self.authorized(method, url, token)
    }

    /// Request against GoTrue (`/auth/v1/{path}`).
    pub(crate) fn auth(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.config.url, path);
        self.authorized(method, url, Some(token))
    }

    fn authorized(&self, method: Method, url: String, token: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.key)
            .bearer_auth(token.unwrap_or(&self.config.key))
    }
}

/// Map a non-success platform status to a takenote error.
pub(crate) fn status_error(service: &str, status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(format!("{} rejected the token", service)),
        StatusCode::FORBIDDEN => Error::Forbidden(format!("{} denied access", service)),
        _ => Error::Storage(format!("{} returned {}: {}", service, status, body)),
    }
}
