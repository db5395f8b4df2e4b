//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Completion (OpenAI-compatible HTTP endpoint, streamed or not)
//! - Transcript storage (in-memory, session-scoped)

pub mod adapter;

pub use adapter::*;
