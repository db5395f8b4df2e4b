use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ConversationStore;
use crate::domain::Turn;

/// Session-scoped transcript held in memory.
///
/// Created empty at session start and dropped with it; appends are
/// serialized behind the mutex, which is all the locking a one-action-
/// at-a-time UI needs.
pub struct InMemoryConversationStore {
    turns: Mutex<Vec<Turn>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, turn: Turn) {
        let mut turns = self.turns.lock().await;
        turns.push(turn);
        debug!("Transcript now holds {} turns", turns.len());
    }

    async fn all_turns(&self) -> Vec<Turn> {
        self.turns.lock().await.clone()
    }
}
