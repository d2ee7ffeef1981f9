//! Stock History Model

use serde::{Deserialize, Serialize};

/// One row of the append-only stock ledger
///
/// `new_stock` is the post-change value read back inside the same
/// transaction that applied the change. `variant_id` is a soft reference:
/// after a product update replaces its variants, old ledger rows keep the
/// id and `variant_name` resolves to NULL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockHistory {
    pub id: i64,
    pub product_id: i64,
    pub variant_id: Option<i64>,
    /// Variant name joined on read (display only)
    pub variant_name: Option<String>,
    pub change_amount: i64,
    pub new_stock: i64,
    pub reason: String,
    pub timestamp: String,
}
