//! Router assembly.

use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::Router;
use std::any::Any;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use takenote_core::defaults::CORS_MAX_AGE_SECS;

use crate::config::Settings;
use crate::error::ApiError;
use crate::handlers::{ai, notes, system};
use crate::middleware::{
    limit_request_size, rate_limit_middleware, reject_suspicious_requests,
    strict_transport_security, MakeRequestUuidV7, SECURITY_HEADERS,
};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the application router with every middleware layer applied.
pub fn build_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let mut app = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health_check))
        .route("/me", get(system::me))
        // Notes CRUD
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/search", post(notes::search_notes))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/notes/:id/restore", post(notes::restore_note))
        .route("/notes/:id/pin", patch(notes::toggle_pin))
        // AI analysis
        .route("/notes/ai/search", post(ai::semantic_search))
        .route("/notes/:id/ai/summary", post(ai::summarize_note))
        .route("/notes/:id/ai/tags", post(ai::tag_note))
        .route("/notes/:id/ai/category", post(ai::categorize_note))
        .route("/notes/:id/ai/process", post(ai::process_note));

    if let Some(docs) = settings.docs_url() {
        app = app.merge(SwaggerUi::new(docs).url("/openapi.json", ApiDoc::openapi()));
    }

    let app = app
        .layer(from_fn(reject_suspicious_requests))
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(DefaultBodyLimit::max(settings.max_body_size))
        .layer(from_fn_with_state(state.clone(), limit_request_size));

    let app = SECURITY_HEADERS.iter().fold(app, |app, &(name, value)| {
        app.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    });

    app.layer(from_fn(strict_transport_security))
        .layer(cors_layer(&settings))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Configured origins, any origin in debug mode when none are configured,
/// otherwise same-origin only.
fn cors_layer(settings: &Settings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS));

    let origins = settings.cors_origins();
    if !origins.is_empty() {
        layer.allow_origin(origins)
    } else if settings.debug {
        layer.allow_origin(AnyOrigin)
    } else {
        layer
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %message, "Handler panicked");
    ApiError::Internal("An unexpected error occurred".to_string()).into_response()
}
