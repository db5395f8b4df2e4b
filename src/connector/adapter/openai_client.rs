use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::{future, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionService;
use crate::domain::{ChatMessage, Completion, DomainError, GenerationParameters};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// Sentinel payload terminating an SSE completion stream.
const STREAM_DONE: &str = "[DONE]";

/// Chat-completions request payload.
///
/// Optional fields use `skip_serializing_if` so an unset stop sequence is
/// absent from the wire, never an empty-string literal.
#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(serde::Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Minimal subset of the non-streaming response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

/// One `chat.completion.chunk` SSE payload. The delta content is absent
/// on role preludes and finish markers.
#[derive(Deserialize)]
struct ApiChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat-completions endpoints (Groq by
/// default).
///
/// Implements [`CompletionService`] so the orchestration layer stays
/// decoupled from transport and serialization details. Supports both
/// delivery shapes: a monolithic JSON response, or an SSE stream of
/// `chat.completion.chunk` payloads decoded into text fragments.
///
/// **Configuration**: endpoint and credential come from the constructor
/// or from the environment:
///
/// ```text
/// GROQ_API_KEY=gsk_...
/// GROQ_BASE_URL=https://api.groq.com/openai
/// ```
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    /// No overall timeout on this one — a long streamed generation must
    /// not be cut off mid-response.
    stream_client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + CHAT_COMPLETIONS_PATH).
    url: String,
}

impl OpenAiCompatClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), CHAT_COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            stream_client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            url,
        }
    }

    /// Convenience constructor reading configuration from the environment:
    /// - `GROQ_API_KEY`  — required; returns `None` when absent
    /// - `GROQ_BASE_URL` — optional; defaults to `https://api.groq.com/openai`
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("GROQ_API_KEY").ok()?;
        let base =
            std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Some(Self::new(key, base))
    }

    fn build_request<'a>(
        messages: &'a [ChatMessage],
        params: &'a GenerationParameters,
    ) -> ApiRequest<'a> {
        ApiRequest {
            model: params.effective_model(),
            messages: messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            temperature: params.temperature(),
            max_tokens: params.max_tokens(),
            top_p: params.top_p(),
            seed: params.seed(),
            stop: params.stop(),
            response_format: params
                .json_mode()
                .then_some(ResponseFormat { kind: "json_object" }),
            stream: params.stream(),
        }
    }

    /// Error payloads can arrive inside the SSE stream as either
    /// `{"error": {"message": ...}}` or `{"error": "..."}`.
    fn chunk_error_message(value: &serde_json::Value) -> Option<String> {
        let error = value.get("error")?;
        if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
            return Some(message.to_string());
        }
        if let Some(message) = error.as_str() {
            return Some(message.to_string());
        }
        Some("service reported an error during streaming".to_string())
    }

    /// Decode one SSE data payload into an optional text fragment.
    fn parse_chunk(data: &str) -> Result<Option<String>, DomainError> {
        let value: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| DomainError::stream(format!("unparseable stream chunk: {e}")))?;

        if let Some(message) = Self::chunk_error_message(&value) {
            return Err(DomainError::service(message));
        }

        let chunk: ApiChunk = serde_json::from_value(value)
            .map_err(|e| DomainError::stream(format!("unexpected chunk shape: {e}")))?;

        Ok(chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content))
    }

    async fn send(
        &self,
        request: &ApiRequest<'_>,
        streaming: bool,
    ) -> Result<reqwest::Response, DomainError> {
        let client = if streaming {
            &self.stream_client
        } else {
            &self.client
        };

        let response = client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {status}: {body}");
            return Err(DomainError::service(format!(
                "completion API returned {status}: {body}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionService for OpenAiCompatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParameters,
    ) -> Result<Completion, DomainError> {
        let request = Self::build_request(messages, params);
        debug!(
            "Requesting completion from {} (stream={})",
            self.url,
            params.stream()
        );

        let response = self.send(&request, params.stream()).await?;

        if params.stream() {
            let fragments = response
                .bytes_stream()
                .eventsource()
                .take_while(|event| {
                    let done = matches!(event, Ok(e) if e.data == STREAM_DONE);
                    future::ready(!done)
                })
                .map(|event| match event {
                    Ok(event) => Self::parse_chunk(&event.data),
                    Err(e) => Err(DomainError::transport(format!("stream interrupted: {e}"))),
                });
            Ok(Completion::Stream(Box::pin(fragments)))
        } else {
            let api_response: ApiResponse = response
                .json()
                .await
                .map_err(|e| DomainError::service(format!("failed to parse response: {e}")))?;

            Ok(Completion::Text(
                api_response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .unwrap_or_default(),
            ))
        }
    }
}
