//! Error types for infrastructure and store operations

use thiserror::Error;

use crate::domain::ServiceKey;

/// Errors that can occur in infrastructure operations
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// NATS subscribe error
    #[error("NATS subscribe error: {0}")]
    NatsSubscribe(String),

    /// NATS request-reply error
    #[error("NATS request error: {0}")]
    NatsRequest(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Result type for infrastructure operations
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::Serialization(err.to_string())
    }
}

/// Errors reported by a resource store or event source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No resource with this key exists
    #[error("service {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    /// A resource with this key already exists
    #[error("service {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    /// The store could not be reached or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the call
    #[error("store failure: {0}")]
    Failure(String),
}

impl StoreError {
    pub fn not_found(key: &ServiceKey) -> Self {
        StoreError::NotFound {
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        }
    }

    pub fn already_exists(key: &ServiceKey) -> Self {
        StoreError::AlreadyExists {
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::StoreFailure,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::NatsConnection(_)
            | InfrastructureError::NatsRequest(_)
            | InfrastructureError::Timeout(_) => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Failure(err.to_string()),
        }
    }
}

/// Caller-visible category of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was malformed; retrying will not help
    InvalidInput,
    /// The addressed resource does not exist
    NotFound,
    /// The underlying store failed; retrying may help
    StoreFailure,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::StoreFailure)
    }
}
