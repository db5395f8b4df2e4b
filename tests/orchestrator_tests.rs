//! Integration tests for the playground core.
//!
//! These tests exercise the turn orchestration end to end against stub
//! completion services, covering both delivery shapes and every failure
//! path.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream;

use playground::{
    ChatMessage, Completion, CompletionService, ConversationStore, DomainError,
    GenerationParameters, InMemoryConversationStore, Role, SubmitTurnUseCase, Turn, SAFETY_MODEL,
};

/// Stub service scripted with a fragment sequence and an optional
/// terminal failure. In non-streaming mode the fragments are joined and
/// returned whole (unless the failure fires first).
struct ScriptedService {
    fragments: Vec<Option<String>>,
    fail_with: Option<String>,
}

impl ScriptedService {
    fn text(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Some(f.to_string())).collect(),
            fail_with: None,
        }
    }

    fn with_gaps(fragments: &[Option<&str>]) -> Self {
        Self {
            fragments: fragments
                .iter()
                .map(|f| f.map(|s| s.to_string()))
                .collect(),
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fragments: Vec::new(),
            fail_with: Some(message.to_string()),
        }
    }

    fn failing_after(fragments: &[&str], message: &str) -> Self {
        Self {
            fragments: fragments.iter().map(|f| Some(f.to_string())).collect(),
            fail_with: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        params: &GenerationParameters,
    ) -> Result<Completion, DomainError> {
        if params.stream() {
            let mut items: Vec<Result<Option<String>, DomainError>> =
                self.fragments.iter().cloned().map(Ok).collect();
            if let Some(ref message) = self.fail_with {
                items.push(Err(DomainError::transport(message.clone())));
            }
            Ok(Completion::Stream(Box::pin(stream::iter(items))))
        } else if let Some(ref message) = self.fail_with {
            Err(DomainError::service(message.clone()))
        } else {
            Ok(Completion::Text(
                self.fragments.iter().flatten().cloned().collect(),
            ))
        }
    }
}

fn setup(service: ScriptedService) -> (Arc<InMemoryConversationStore>, SubmitTurnUseCase) {
    let store = Arc::new(InMemoryConversationStore::new());
    let use_case = SubmitTurnUseCase::new(store.clone(), Arc::new(service));
    (store, use_case)
}

#[tokio::test]
async fn test_submit_appends_exactly_two_turns() {
    let (store, use_case) = setup(ScriptedService::text(&["Hello! How can I help?"]));

    let params = GenerationParameters::new("llama3-8b-8192")
        .with_temperature(0.5)
        .with_max_tokens(1024)
        .with_top_p(1.0)
        .with_seed(0)
        .with_stop_sequence("")
        .with_stream(false);

    use_case.execute("Hi there", &params).await;

    let turns = store.all_turns().await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0], Turn::user("Hi there"));
    assert_eq!(turns[1], Turn::assistant("Hello! How can I help?"));
}

#[tokio::test]
async fn test_every_submit_grows_transcript_by_two() {
    let (store, use_case) = setup(ScriptedService::text(&["reply"]));
    let params = GenerationParameters::default();

    for i in 0..3 {
        use_case.execute(&format!("message {i}"), &params).await;
        let turns = store.all_turns().await;
        assert_eq!(turns.len(), (i + 1) * 2);
        assert_eq!(turns[turns.len() - 2].role(), Role::User);
        assert_eq!(turns[turns.len() - 1].role(), Role::Assistant);
    }
}

#[tokio::test]
async fn test_streaming_and_monolithic_delivery_are_content_equivalent() {
    let fragments = ["The answer", " is", " 42."];

    let (streamed_store, streamed) = setup(ScriptedService::text(&fragments));
    streamed
        .execute("question", &GenerationParameters::default().with_stream(true))
        .await;

    let (whole_store, whole) = setup(ScriptedService::text(&fragments));
    whole
        .execute("question", &GenerationParameters::default().with_stream(false))
        .await;

    let streamed_turns = streamed_store.all_turns().await;
    let whole_turns = whole_store.all_turns().await;
    assert_eq!(streamed_turns[1].content(), "The answer is 42.");
    assert_eq!(streamed_turns[1], whole_turns[1]);
}

#[tokio::test]
async fn test_empty_fragments_contribute_nothing() {
    let (store, use_case) = setup(ScriptedService::with_gaps(&[
        Some("Hel"),
        None,
        Some(""),
        Some("lo"),
    ]));

    use_case
        .execute("greet me", &GenerationParameters::default().with_stream(true))
        .await;

    assert_eq!(store.all_turns().await[1], Turn::assistant("Hello"));
}

#[tokio::test]
async fn test_request_failure_becomes_assistant_error_message() {
    let (store, use_case) = setup(ScriptedService::failing("connection refused"));

    use_case
        .execute("Hi", &GenerationParameters::default().with_stream(false))
        .await;

    let turns = store.all_turns().await;
    assert_eq!(turns.len(), 2);
    assert!(turns[1].content().starts_with("Error: "));
    assert!(turns[1].content().contains("connection refused"));
}

#[tokio::test]
async fn test_mid_stream_failure_discards_partial_accumulation() {
    let (store, use_case) = setup(ScriptedService::failing_after(&["Par"], "stream interrupted"));

    use_case
        .execute("Hi", &GenerationParameters::default().with_stream(true))
        .await;

    let turns = store.all_turns().await;
    assert_eq!(turns.len(), 2);
    assert!(turns[1].content().starts_with("Error: "));
    // All-or-nothing substitution: no trace of the partial fragment.
    assert!(!turns[1].content().contains("Par"));
}

#[tokio::test]
async fn test_user_turn_is_visible_even_when_the_call_fails_immediately() {
    let (store, use_case) = setup(ScriptedService::failing("boom"));

    use_case
        .execute("still visible", &GenerationParameters::default())
        .await;

    assert_eq!(store.all_turns().await[0], Turn::user("still visible"));
}

#[tokio::test]
async fn test_transcript_stays_usable_after_a_failed_turn() {
    let store = Arc::new(InMemoryConversationStore::new());

    let failing = SubmitTurnUseCase::new(store.clone(), Arc::new(ScriptedService::failing("down")));
    failing
        .execute("first", &GenerationParameters::default())
        .await;

    let recovered =
        SubmitTurnUseCase::new(store.clone(), Arc::new(ScriptedService::text(&["back up"])));
    recovered
        .execute("second", &GenerationParameters::default().with_stream(false))
        .await;

    let turns = store.all_turns().await;
    assert_eq!(turns.len(), 4);
    assert!(turns[1].content().starts_with("Error: "));
    assert_eq!(turns[3], Turn::assistant("back up"));
}

/// Captures the request the orchestrator actually issues.
struct CapturingService {
    seen: tokio::sync::Mutex<Option<(Vec<ChatMessage>, String, Option<String>)>>,
}

impl CapturingService {
    fn new() -> Self {
        Self {
            seen: tokio::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl CompletionService for CapturingService {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParameters,
    ) -> Result<Completion, DomainError> {
        *self.seen.lock().await = Some((
            messages.to_vec(),
            params.effective_model().to_string(),
            params.stop().map(|s| s.to_string()),
        ));
        Ok(Completion::Text("ok".to_string()))
    }
}

#[tokio::test]
async fn test_request_carries_system_prompt_and_newest_message_only() {
    let service = Arc::new(CapturingService::new());
    let store = Arc::new(InMemoryConversationStore::new());
    let use_case = SubmitTurnUseCase::new(store.clone(), service.clone());
    let params = GenerationParameters::default().with_stream(false);

    // Two turns: the second request must not replay the first exchange.
    use_case.execute("earlier message", &params).await;
    use_case.execute("newest message", &params).await;

    let seen = service.seen.lock().await;
    let (messages, _, _) = seen.as_ref().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], ChatMessage::system("You are a helpful assistant."));
    assert_eq!(messages[1], ChatMessage::user("newest message"));
}

#[tokio::test]
async fn test_safety_mode_overrides_the_selected_model() {
    let service = Arc::new(CapturingService::new());
    let store = Arc::new(InMemoryConversationStore::new());
    let use_case = SubmitTurnUseCase::new(store, service.clone());

    let params = GenerationParameters::new("mixtral-8x7b-32768")
        .with_stream(false)
        .with_safety_mode(true);
    use_case.execute("screen this", &params).await;

    let seen = service.seen.lock().await;
    let (_, model, _) = seen.as_ref().unwrap();
    assert_eq!(model, SAFETY_MODEL);
}

#[tokio::test]
async fn test_blank_stop_sequence_never_reaches_the_service() {
    let service = Arc::new(CapturingService::new());
    let store = Arc::new(InMemoryConversationStore::new());
    let use_case = SubmitTurnUseCase::new(store, service.clone());

    let params = GenerationParameters::default()
        .with_stream(false)
        .with_stop_sequence("  ");
    use_case.execute("hello", &params).await;

    let seen = service.seen.lock().await;
    let (_, _, stop) = seen.as_ref().unwrap();
    assert_eq!(*stop, None);
}

#[tokio::test]
async fn test_empty_model_output_is_a_real_turn() {
    let (store, use_case) = setup(ScriptedService::text(&[]));

    use_case
        .execute("say nothing", &GenerationParameters::default().with_stream(false))
        .await;

    let turns = store.all_turns().await;
    assert_eq!(turns[1], Turn::assistant(""));
}
