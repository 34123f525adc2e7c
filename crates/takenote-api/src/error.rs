//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use takenote_core::{Error, ErrorResponse};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound { error: String, detail: String },
    Validation(String),
    PayloadTooLarge(String),
    RateLimited { retry_after_secs: u64 },
    Unavailable(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NoteNotFound(id) => ApiError::NotFound {
                error: format!("Note with ID {} not found", id),
                detail: format!(
                    "The requested note with ID {} does not exist or you don't have permission to access it.",
                    id
                ),
            },
            Error::NotFound(msg) => ApiError::NotFound {
                error: "Not found".to_string(),
                detail: msg,
            },
            Error::InvalidInput(msg) => ApiError::Validation(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            Error::Request(msg) => {
                error!(error = %msg, "Platform request failed");
                ApiError::Unavailable("Upstream service unavailable".to_string())
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal("An unexpected error occurred".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // body limit hit while buffering
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (body, extra_header) = match self {
            ApiError::BadRequest(msg) => (error_body("Invalid request", Some(msg)), None),
            ApiError::Unauthorized(msg) => (
                error_body("Authentication failed", Some(msg)),
                Some((header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))),
            ),
            ApiError::Forbidden(msg) => (error_body("Access denied", Some(msg)), None),
            ApiError::NotFound { error, detail } => (error_body(&error, Some(detail)), None),
            ApiError::Validation(msg) => (error_body("Validation error", Some(msg)), None),
            ApiError::PayloadTooLarge(msg) => {
                (error_body("Request entity too large", Some(msg)), None)
            }
            ApiError::RateLimited { retry_after_secs } => (
                error_body(
                    "rate_limit_exceeded",
                    Some("Rate limit exceeded. Please try again later.".to_string()),
                ),
                Some((header::RETRY_AFTER, HeaderValue::from(retry_after_secs))),
            ),
            ApiError::Unavailable(msg) => (error_body("Service unavailable", Some(msg)), None),
            ApiError::Internal(msg) => (error_body("Internal server error", Some(msg)), None),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some((name, value)) = extra_header {
            response.headers_mut().insert(name, value);
        }
        response
    }
}

fn error_body(error: &str, detail: Option<String>) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        detail,
    }
}
