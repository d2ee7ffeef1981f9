use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Server state shared across request handlers
///
/// Holds the configuration and the SQLite connection pool. The pool is the
/// only cross-request shared resource; all synchronization between
/// concurrent requests is delegated to the storage engine's transactions.
/// Cloning is cheap (the pool is internally reference-counted) and every
/// handler receives its own clone via axum's `State` extractor — there is
/// no ambient singleton.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
}

impl ServerState {
    /// Initialize server state: work directory, database, migrations
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
        })
    }

    /// State backed by an in-memory database; used by tests
    pub async fn in_memory(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new_in_memory().await?;
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
        })
    }
}
