//! takenote HTTP API server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use takenote_api::{build_router, AppState, Settings};
use takenote_core::{AuthVerifier, NoteRepository};
use takenote_db::{
    MemoryNoteRepository, StaticTokenVerifier, SupabaseAuth, SupabaseClient, SupabaseConfig,
    SupabaseNoteRepository,
};
use takenote_inference::{AiService, HuggingFaceBackend, HuggingFaceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "takenote_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "takenote_api=debug,takenote_db=debug,takenote_inference=debug,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("takenote-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            // no ANSI in files unless asked for
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
        None
    } else {
        let mut layer = tracing_subscriber::fmt::layer();
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let settings = Settings::from_env();
    for warning in settings.validate()? {
        warn!("Configuration warning: {}", warning);
    }
    info!(settings = ?settings, "Starting {}", settings.app_name);

    let (notes, auth) = platform_bindings(&settings)?;

    match notes.health_check().await {
        Ok(true) => info!("Database connection verified"),
        Ok(false) => warn!("Database connection test failed"),
        Err(e) => warn!(error = %e, "Database connection test failed"),
    }

    let ai = if settings.ai_enabled {
        match HuggingFaceBackend::new(HuggingFaceConfig::from_env()) {
            Ok(backend) => {
                info!(timeout_secs = settings.ai_timeout_secs, "AI backend: huggingface");
                AiService::new(Arc::new(backend), settings.ai_timeout())
            }
            Err(e) => {
                error!(error = %e, "AI backend unavailable, using fallback heuristics only");
                AiService::disabled()
            }
        }
    } else {
        info!("AI disabled, using fallback heuristics only");
        AiService::disabled()
    };

    let addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid HOST/PORT: {}", settings.bind_addr()))?;

    let state = AppState::new(notes, auth, ai, settings);
    if let Some(limiter) = state.rate_limiter.clone() {
        let period = state.settings.rate_limit_period().max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                limiter.retain_recent();
                limiter.shrink_to_fit();
            }
        });
    }

    let app = build_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Shutting down Take Note Backend API");
    Ok(())
}

/// Supabase bindings when configured. Debug builds without Supabase settings
/// run against an in-memory store that rejects every token.
fn platform_bindings(
    settings: &Settings,
) -> anyhow::Result<(Arc<dyn NoteRepository>, Arc<dyn AuthVerifier>)> {
    match (&settings.supabase_url, &settings.supabase_key) {
        (Some(url), Some(key)) => {
            let client = SupabaseClient::new(SupabaseConfig::new(url.as_str(), key.as_str()))
                .context("failed to build Supabase client")?;
            let notes: Arc<dyn NoteRepository> = Arc::new(SupabaseNoteRepository::new(client.clone()));
            let auth: Arc<dyn AuthVerifier> = Arc::new(SupabaseAuth::new(client));
            Ok((notes, auth))
        }
        _ => {
            warn!("Supabase not configured, using in-memory note store");
            let notes: Arc<dyn NoteRepository> = Arc::new(MemoryNoteRepository::new());
            let auth: Arc<dyn AuthVerifier> = Arc::new(StaticTokenVerifier::new());
            Ok((notes, auth))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
