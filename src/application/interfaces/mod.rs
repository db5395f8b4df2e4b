mod completion_service;
mod conversation_store;

pub use completion_service::*;
pub use conversation_store::*;
