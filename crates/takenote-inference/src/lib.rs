//! # takenote-inference
//!
//! Hosted model backends for note analysis.
//!
//! This crate provides:
//! - Hugging Face Inference API backend (summarization, NER, classification,
//!   sentence similarity), trying configured models in order
//! - [`AiService`], which bounds every model call with a timeout and falls
//!   back to the heuristics in `takenote_core::text` on any failure
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use takenote_inference::{AiService, HuggingFaceBackend};
//!
//! # async fn run() -> takenote_core::Result<()> {
//! let backend = HuggingFaceBackend::from_env()?;
//! let ai = AiService::new(Arc::new(backend), Duration::from_secs(30));
//! let summary = ai.summarize("Long note text ...", 3).await;
//! println!("{} ({})", summary.summary, summary.model);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod huggingface;
pub mod service;

// Mock analysis backend for testing
#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use config::HuggingFaceConfig;
pub use huggingface::HuggingFaceBackend;
pub use service::AiService;

#[cfg(any(test, feature = "test-support"))]
pub use mock::MockAnalysisBackend;
