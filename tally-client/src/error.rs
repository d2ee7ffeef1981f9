//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed (connection refused, timeout, DNS…).
    /// The sync coordinator treats this as "server unreachable" and
    /// queues the action for replay.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected a stale write; carries its current snapshot.
    /// Terminal for replay purposes — the queued action is dropped.
    #[error("Conflict: server has a newer version")]
    Conflict { current: serde_json::Value },

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server-side failure (500)
    #[error("Server error: {0}")]
    Server(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local queue storage failed
    #[error("Queue storage error: {0}")]
    Queue(#[from] crate::queue::StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the failure means the server could not be reached at all,
    /// as opposed to the server answering with an error
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
