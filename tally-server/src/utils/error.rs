//! Unified error handling
//!
//! [`AppError`] is the application-level error returned by every handler.
//! Conversion from the repository layer happens via `From<RepoError>`, and
//! `IntoResponse` renders the wire contract:
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | NotFound | 404 | `{"error": msg}` |
//! | Validation | 400 | `{"error": msg}` |
//! | Conflict | 409 | `{"error": msg, "current": <snapshot>}` |
//! | Database / Internal | 500 | `{"error": <generic>}` |
//!
//! Database and internal messages are logged server-side and masked on the
//! wire.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Error body for non-2xx responses
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    /// Current server snapshot, present on conflicts only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<serde_json::Value>,
}

/// Application error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Stale optimistic-concurrency token; carries the current server row
    #[error("{message}")]
    Conflict {
        message: String,
        current: serde_json::Value,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    current: None,
                },
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    current: None,
                },
            ),
            AppError::Conflict { message, current } => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: message,
                    current: Some(current),
                },
            ),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Database error".to_string(),
                        current: None,
                    },
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error".to_string(),
                        current: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Validation(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Conflict { current } => AppError::Conflict {
                message: "Conflict: Server has a newer version".to_string(),
                current,
            },
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
