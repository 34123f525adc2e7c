//! # takenote-core
//!
//! Core types, traits, and abstractions for the takenote backend.
//!
//! This crate provides the note data model, the error type shared by every
//! crate, the contracts for the external platform (auth, storage, model
//! inference), and the fallback text-analysis heuristics used when the
//! external models are unavailable.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod text;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use text::{
    categorize, clamp_count, extract_keywords, keyword_frequencies, similarity, split_sentences,
    summarize, truncate_chars,
};
pub use traits::*;
