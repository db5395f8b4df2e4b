use async_trait::async_trait;

use crate::domain::Turn;

/// Ordered transcript of one interactive session.
///
/// Append-only from the orchestrator's perspective: turns are never
/// updated or removed once added, and `all_turns` always reflects every
/// prior append in issuance order.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Add one turn at the end of the transcript. Empty content is
    /// permitted (it represents a real, possibly empty, model output).
    async fn append(&self, turn: Turn);

    /// The full transcript, newest last.
    async fn all_turns(&self) -> Vec<Turn>;
}
