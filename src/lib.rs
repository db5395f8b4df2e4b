pub mod application;
pub mod connector;
pub mod domain;

pub use application::{CompletionService, ConversationStore, SubmitTurnUseCase};

pub use connector::{InMemoryConversationStore, OpenAiCompatClient};

pub use domain::{
    ChatMessage, Completion, DomainError, FragmentStream, GenerationParameters, MessageRole,
    ModelCatalog, Role, Turn, DEFAULT_MODEL, SAFETY_MODEL,
};
