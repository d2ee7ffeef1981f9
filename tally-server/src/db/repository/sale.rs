//! Sale Repository — the checkout transaction
//!
//! Converts a validated cart into one sale row, its line items, the stock
//! decrements and the matching ledger rows, all inside a single
//! transaction. Any failure mid-sequence (a missing product or variant id,
//! a storage error) rolls back every statement: no partial sale is ever
//! observable.
//!
//! Stock is allowed to go negative. There is no reservation step before
//! checkout, so two terminals selling the last unit both succeed and the
//! ledger records the overdraft.

use super::{RepoError, RepoResult, stock_history};
use shared::models::CheckoutRequest;
use sqlx::SqlitePool;

/// Process a checkout; returns the new sale id.
pub async fn checkout(pool: &SqlitePool, request: &CheckoutRequest) -> RepoResult<i64> {
    if request.items.is_empty() {
        return Err(RepoError::Validation("Cart is empty".into()));
    }
    for item in &request.items {
        if item.quantity <= 0 {
            return Err(RepoError::Validation(format!(
                "Quantity must be positive: {}",
                item.quantity
            )));
        }
    }

    let mut tx = pool.begin().await?;

    let sale_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO sales (total_amount) VALUES (?) RETURNING id",
    )
    .bind(request.total)
    .fetch_one(&mut *tx)
    .await?;

    let reason = format!("Sale #{sale_id}");

    for item in &request.items {
        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, variant_id, quantity, price_at_sale) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(sale_id)
        .bind(item.id)
        .bind(item.selected_variant_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;

        // Decrement the variant when one was selected, else the product;
        // zero rows affected means the id does not exist and aborts the
        // whole sale
        let new_stock = match item.selected_variant_id {
            Some(variant_id) => {
                let rows = sqlx::query("UPDATE product_variants SET stock = stock - ? WHERE id = ?")
                    .bind(item.quantity)
                    .bind(variant_id)
                    .execute(&mut *tx)
                    .await?;
                if rows.rows_affected() == 0 {
                    return Err(RepoError::NotFound(format!(
                        "Variant {variant_id} not found"
                    )));
                }
                sqlx::query_scalar::<_, i64>("SELECT stock FROM product_variants WHERE id = ?")
                    .bind(variant_id)
                    .fetch_one(&mut *tx)
                    .await?
            }
            None => {
                let rows = sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ?")
                    .bind(item.quantity)
                    .bind(item.id)
                    .execute(&mut *tx)
                    .await?;
                if rows.rows_affected() == 0 {
                    return Err(RepoError::NotFound(format!("Product {} not found", item.id)));
                }
                sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = ?")
                    .bind(item.id)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        stock_history::append(
            &mut *tx,
            item.id,
            item.selected_variant_id,
            -item.quantity,
            new_stock,
            &reason,
        )
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(sale_id, items = request.items.len(), total = request.total, "Checkout committed");
    Ok(sale_id)
}
