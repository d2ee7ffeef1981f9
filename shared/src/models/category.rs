//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// `updated_at` (unix seconds) is the optimistic-concurrency token: it
/// strictly increases on every successful write and stale writers are
/// rejected with the current row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub updated_at: i64,
}

/// Create/update category payload
///
/// POST and PUT share one body shape. A missing `updated_at` means
/// "stamp with the server clock".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub updated_at: Option<i64>,
}
