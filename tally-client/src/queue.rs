//! redb-based durable storage for the offline action queue
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `offline_actions` | sequence (u64) | `QueuedAction` JSON | Pending replay queue |
//! | `meta` | name | u64 | Next sequence number |
//! | `preferences` | name | JSON | Operator preferences (low-stock threshold) |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), so actions recorded while offline survive a
//! terminal reload or power loss before connectivity returns.

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::models::QueuedAction;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Pending actions: key = insertion sequence, value = JSON-serialized QueuedAction
const ACTIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("offline_actions");

/// Queue metadata: next sequence number
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

/// Operator preferences: key = name, value = JSON
const PREFS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("preferences");

const NEXT_SEQ_KEY: &str = "next_seq";
const LOW_STOCK_THRESHOLD_KEY: &str = "low_stock_threshold";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable offline queue backed by redb
#[derive(Clone)]
pub struct OfflineQueue {
    db: Arc<Database>,
}

impl OfflineQueue {
    /// Open or create the store at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory store (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACTIONS_TABLE)?;
            let _ = write_txn.open_table(PREFS_TABLE)?;
            let mut meta = write_txn.open_table(META_TABLE)?;
            if meta.get(NEXT_SEQ_KEY)?.is_none() {
                meta.insert(NEXT_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Append an action; returns its sequence number.
    ///
    /// Sequence numbers only grow, so insertion order is replay order even
    /// after interleaved removals.
    pub fn push(&self, action: &QueuedAction) -> StorageResult<u64> {
        let data = serde_json::to_vec(action)?;
        let write_txn = self.db.begin_write()?;
        let seq;
        {
            let mut meta = write_txn.open_table(META_TABLE)?;
            seq = meta.get(NEXT_SEQ_KEY)?.map(|v| v.value()).unwrap_or(0);
            meta.insert(NEXT_SEQ_KEY, seq + 1)?;

            let mut actions = write_txn.open_table(ACTIONS_TABLE)?;
            actions.insert(seq, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(seq)
    }

    /// All pending actions in insertion order
    pub fn list(&self) -> StorageResult<Vec<(u64, QueuedAction)>> {
        let read_txn = self.db.begin_read()?;
        let actions = read_txn.open_table(ACTIONS_TABLE)?;
        let mut result = Vec::new();
        for entry in actions.iter()? {
            let (key, value) = entry?;
            let action: QueuedAction = serde_json::from_slice(value.value())?;
            result.push((key.value(), action));
        }
        Ok(result)
    }

    /// Remove one action by sequence; returns whether it existed
    pub fn remove(&self, seq: u64) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed;
        {
            let mut actions = write_txn.open_table(ACTIONS_TABLE)?;
            existed = actions.remove(seq)?.is_some();
        }
        write_txn.commit()?;
        Ok(existed)
    }

    /// Number of pending actions
    pub fn len(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let actions = read_txn.open_table(ACTIONS_TABLE)?;
        Ok(actions.len()?)
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    // ========== Preferences ==========

    /// Persist the operator's low-stock threshold preference
    pub fn set_low_stock_threshold(&self, threshold: i64) -> StorageResult<()> {
        let data = serde_json::to_vec(&threshold)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut prefs = write_txn.open_table(PREFS_TABLE)?;
            prefs.insert(LOW_STOCK_THRESHOLD_KEY, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Stored low-stock threshold, if the operator ever set one
    pub fn low_stock_threshold(&self) -> StorageResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let prefs = read_txn.open_table(PREFS_TABLE)?;
        match prefs.get(LOW_STOCK_THRESHOLD_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}
