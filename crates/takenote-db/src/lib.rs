//! # takenote-db
//!
//! Storage and identity bindings for takenote.
//!
//! Notes live in the Supabase platform; this crate never reimplements
//! storage. It provides:
//! - [`SupabaseNoteRepository`]: note CRUD through PostgREST, issued with the
//!   caller's token so row-level security applies
//! - [`SupabaseAuth`]: bearer-token verification through GoTrue
//! - [`MemoryNoteRepository`] and [`StaticTokenVerifier`]: in-process
//!   stand-ins for tests and local development
//!
//! ## Example
//!
//! ```rust,no_run
//! use takenote_db::{SupabaseAuth, SupabaseClient, SupabaseConfig, SupabaseNoteRepository};
//!
//! # fn run() -> takenote_core::Result<()> {
//! let client = SupabaseClient::new(SupabaseConfig::from_env()?)?;
//! let notes = SupabaseNoteRepository::new(client.clone());
//! let auth = SupabaseAuth::new(client);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod memory;
pub mod notes;

// Re-export core types
pub use takenote_core::*;

pub use auth::SupabaseAuth;
pub use client::{SupabaseClient, SupabaseConfig};
pub use memory::{MemoryNoteRepository, StaticTokenVerifier};
pub use notes::SupabaseNoteRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
