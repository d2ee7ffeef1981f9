//! Stock Ledger Repository
//!
//! Append-only audit trail of every stock-affecting event. The ledger
//! never computes stock itself: callers pass the signed delta and the
//! post-change value they observed inside their own transaction.

use super::RepoResult;
use shared::models::StockHistory;
use sqlx::{SqliteConnection, SqlitePool};

/// Append one ledger row on the caller's connection.
///
/// Called by the sale processor and the catalog store from inside their
/// transactions, so a rolled-back mutation leaves no ledger trace.
pub async fn append(
    conn: &mut SqliteConnection,
    product_id: i64,
    variant_id: Option<i64>,
    change_amount: i64,
    new_stock: i64,
    reason: &str,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO stock_history (product_id, variant_id, change_amount, new_stock, reason) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(product_id)
    .bind(variant_id)
    .bind(change_amount)
    .bind(new_stock)
    .bind(reason)
    .execute(conn)
    .await?;
    Ok(())
}

/// Ledger rows for one product, newest first, with the variant name joined
/// for display. Replaced variants resolve to NULL — old rows keep their
/// ids as historical data.
pub async fn history(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<StockHistory>> {
    let rows = sqlx::query_as::<_, StockHistory>(
        "SELECT h.id, h.product_id, h.variant_id, v.name AS variant_name, h.change_amount, h.new_stock, h.reason, h.timestamp \
         FROM stock_history h \
         LEFT JOIN product_variants v ON h.variant_id = v.id \
         WHERE h.product_id = ? \
         ORDER BY h.id DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
