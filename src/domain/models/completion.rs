use std::pin::Pin;

use futures_util::Stream;

use crate::domain::DomainError;

/// Lazy, finite, single-pass sequence of streamed text fragments.
///
/// An item of `Ok(None)` is a content-free chunk (keepalive, role
/// prelude, finish marker); it contributes no text and is not an error.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<Option<String>, DomainError>> + Send>>;

/// The two delivery shapes a completion request can resolve to.
///
/// Modeling both as one sum type lets callers accumulate uniformly
/// instead of branching at every call site.
pub enum Completion {
    /// Full response text, available at once.
    Text(String),
    /// Incremental fragments, exhausted in one pass.
    Stream(FragmentStream),
}

impl Completion {
    pub fn is_stream(&self) -> bool {
        matches!(self, Completion::Stream(_))
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Completion::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Completion::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
