use async_trait::async_trait;

use crate::domain::{ChatMessage, Completion, DomainError, GenerationParameters};

/// An interface for issuing one completion request against a hosted
/// model endpoint.
///
/// Implementors encapsulate transport, serialization, and vendor-specific
/// API details. Consumers (e.g. [`crate::application::SubmitTurnUseCase`])
/// remain decoupled from any particular provider or HTTP client library.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `messages` with the given generation parameters and return
    /// either the full response text or a lazy fragment stream, depending
    /// on `params.stream()`.
    ///
    /// Fails on network errors, authentication failures, invalid parameter
    /// combinations, or service-side errors. A streamed result may also
    /// fail mid-consumption, surfaced as an `Err` item in the stream.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParameters,
    ) -> Result<Completion, DomainError>;
}
