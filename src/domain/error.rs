use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::ServiceError(msg.into())
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::StreamError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::ServiceError(_))
    }

    pub fn is_stream_error(&self) -> bool {
        matches!(self, Self::StreamError(_))
    }
}
