mod in_memory_conversation_store;
mod openai_client;

pub use in_memory_conversation_store::*;
pub use openai_client::*;
