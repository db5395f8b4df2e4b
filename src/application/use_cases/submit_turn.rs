use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::application::{CompletionService, ConversationStore};
use crate::domain::{ChatMessage, Completion, DomainError, GenerationParameters, Turn};

/// Fixed instruction prepended to every request.
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Executes one full chat turn: appends the user message, issues a single
/// completion request, resolves it (streamed or not), and appends exactly
/// one assistant turn.
///
/// Failures never escape: any transport, service, or mid-stream error is
/// captured and substituted as an `Error: ...` assistant message, so the
/// transcript stays usable for the next turn.
pub struct SubmitTurnUseCase {
    store: Arc<dyn ConversationStore>,
    completion_service: Arc<dyn CompletionService>,
}

impl SubmitTurnUseCase {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        completion_service: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            store,
            completion_service,
        }
    }

    /// Run one turn to completion and return the appended assistant turn.
    ///
    /// Callers are expected to suppress empty input; this method performs
    /// no validation of `user_text`. The user turn is appended before the
    /// remote call so it is visible even when the call fails or stalls.
    ///
    /// Each request is stateless: only the fixed system instruction and
    /// the new user message are sent, prior turns are not replayed.
    pub async fn execute(&self, user_text: &str, params: &GenerationParameters) -> Turn {
        info!("Submitting turn ({})", params.summary());
        let start_time = Instant::now();

        self.store.append(Turn::user(user_text)).await;

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_text),
        ];

        let content = match self.resolve(&messages, params).await {
            Ok(text) => text,
            Err(e) => {
                // All-or-nothing: any partial accumulation is discarded and
                // the failure becomes the assistant message for this turn.
                warn!("Completion failed: {e}");
                format!("Error: {e}")
            }
        };

        let assistant_turn = Turn::assistant(content);
        self.store.append(assistant_turn.clone()).await;

        debug!(
            "Turn completed in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
        assistant_turn
    }

    /// Issue the request and accumulate the response into one string.
    async fn resolve(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParameters,
    ) -> Result<String, DomainError> {
        match self.completion_service.complete(messages, params).await? {
            Completion::Text(text) => Ok(text),
            Completion::Stream(mut fragments) => {
                let mut accumulated = String::new();
                while let Some(fragment) = fragments.next().await {
                    // Content-free chunks contribute nothing; an error
                    // terminates the whole accumulation.
                    if let Some(text) = fragment? {
                        accumulated.push_str(&text);
                    }
                }
                Ok(accumulated)
            }
        }
    }
}
