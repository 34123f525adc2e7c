//! Request middleware: correlation IDs, per-client rate limiting, security
//! headers and rejection of injection-looking requests.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::SocketAddr;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Client address for rate limiting: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the peer address.
pub fn client_ip(request: &Request) -> String {
    let headers = request.headers();
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        let client = client_ip(&request);
        if limiter.check_key(&client).is_err() {
            warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
            return ApiError::RateLimited {
                retry_after_secs: state.settings.rate_limit_period_secs,
            }
            .into_response();
        }
    }
    next.run(request).await
}

static SUSPICIOUS: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"\bunion\s+select\b|\bdrop\s+table\b|\bdelete\s+from\b|\binsert\s+into\b|\bupdate\s+set\b|<\s*script|script>|javascript:|vbscript:",
    )
    .ok()
});

/// True when the path or query string carries SQL or script injection markers.
pub fn is_suspicious(path: &str, query: Option<&str>) -> bool {
    let Some(pattern) = SUSPICIOUS.as_ref() else {
        return false;
    };
    let decoded = |raw: &str| {
        let spaced = raw.replace('+', " ");
        urlencoding::decode(&spaced)
            .map(|s| s.into_owned())
            .unwrap_or(spaced)
            .to_lowercase()
    };
    pattern.is_match(&decoded(path)) || query.is_some_and(|q| pattern.is_match(&decoded(q)))
}

pub async fn reject_suspicious_requests(request: Request, next: Next) -> Response {
    let uri = request.uri();
    if is_suspicious(uri.path(), uri.query()) {
        warn!(method = %request.method(), path = %uri.path(), "Suspicious request rejected");
        return ApiError::BadRequest("Invalid request".to_string()).into_response();
    }
    next.run(request).await
}

/// Rejects requests whose declared `Content-Length` exceeds the configured
/// maximum. Bodies without a declared length are capped by `DefaultBodyLimit`
/// when a handler buffers them.
pub async fn limit_request_size(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let max = state.settings.max_body_size;
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(len) = declared.filter(|len| *len > max as u64) {
        warn!(content_length = len, max, path = %request.uri().path(), "Request body too large");
        return ApiError::PayloadTooLarge(format!(
            "Request body of {} bytes exceeds the {} byte limit",
            len, max
        ))
        .into_response();
    }
    next.run(request).await
}

/// Static security headers added to every response.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
];

/// HSTS for requests that arrived over TLS (directly or via a proxy).
pub async fn strict_transport_security(request: Request, next: Next) -> Response {
    let https = request.uri().scheme_str() == Some("https")
        || request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("https"));

    let mut response = next.run(request).await;
    if https {
        response.headers_mut().insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
    response
}
