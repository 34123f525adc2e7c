//! # takenote-api
//!
//! HTTP surface of the takenote backend: note CRUD, AI analysis and service
//! endpoints on top of `axum`, authenticated with bearer tokens verified by
//! the auth platform.
//!
//! The binary wires the Supabase bindings and the Hugging Face backend into
//! [`AppState`]; tests wire in-memory stand-ins instead and drive
//! [`build_router`] directly.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use config::Settings;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
