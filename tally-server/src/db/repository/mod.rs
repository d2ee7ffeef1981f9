//! Repository Module
//!
//! CRUD and transactional operations over the SQLite tables. Repositories
//! are free functions taking the pool (or a transaction connection)
//! explicitly — no ambient database handle.

// Catalog
pub mod category;
pub mod product;

// Checkout
pub mod sale;

// Ledger and reporting
pub mod stats;
pub mod stock_history;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Stale `updated_at` on an optimistic-concurrency check.
    /// Carries the current server-side row so the caller can decide
    /// whether to overwrite or back off.
    #[error("Conflict: server has a newer version")]
    Conflict { current: serde_json::Value },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::SqlitePool;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    /// In-memory SQLite pool with the real schema applied.
    ///
    /// Single connection: every checkout sees the same in-memory database.
    pub async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        crate::db::MIGRATOR.run(&pool).await.unwrap();
        pool
    }
}
