//! HTTP handlers for takenote-api.

pub mod ai;
pub mod notes;
pub mod system;
