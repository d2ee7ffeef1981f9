//! Product Repository
//!
//! Catalog mutations run inside a single transaction together with their
//! stock-ledger rows: a product save either lands completely (row update,
//! variant replacement, ledger entries) or not at all.

use std::collections::HashMap;

use super::{RepoError, RepoResult, stock_history};
use shared::models::{Product, ProductInput, ProductVariant};
use shared::util::now_secs;
use sqlx::SqlitePool;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.price, p.stock, p.category_id, c.name AS category_name, p.image_url, p.updated_at";

fn validate(data: &ProductInput) -> RepoResult<()> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Product name cannot be empty".into()));
    }
    if data.price < 0.0 {
        return Err(RepoError::Validation(format!(
            "Price cannot be negative: {}",
            data.price
        )));
    }
    if data.stock < 0 {
        return Err(RepoError::Validation(format!(
            "Stock cannot be negative: {}",
            data.stock
        )));
    }
    for variant in &data.variants {
        if variant.name.trim().is_empty() {
            return Err(RepoError::Validation("Variant name cannot be empty".into()));
        }
        if variant.stock < 0 {
            return Err(RepoError::Validation(format!(
                "Variant stock cannot be negative: {}",
                variant.stock
            )));
        }
    }
    Ok(())
}

/// Find all products with category name joined and variants attached
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let mut products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p LEFT JOIN categories c ON p.category_id = c.id ORDER BY p.id",
    ))
    .fetch_all(pool)
    .await?;

    let variants = sqlx::query_as::<_, ProductVariant>(
        "SELECT id, product_id, name, stock, price_adjustment FROM product_variants ORDER BY product_id, id",
    )
    .fetch_all(pool)
    .await?;

    let mut by_product: HashMap<i64, Vec<ProductVariant>> = HashMap::new();
    for variant in variants {
        by_product.entry(variant.product_id).or_default().push(variant);
    }
    for product in &mut products {
        if let Some(list) = by_product.remove(&product.id) {
            product.variants = list;
        }
    }
    Ok(products)
}

/// Find a product by id with category name and variants attached
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p LEFT JOIN categories c ON p.category_id = c.id WHERE p.id = ?",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match product {
        Some(mut product) => {
            product.variants = sqlx::query_as::<_, ProductVariant>(
                "SELECT id, product_id, name, stock, price_adjustment FROM product_variants WHERE product_id = ? ORDER BY id",
            )
            .bind(product.id)
            .fetch_all(pool)
            .await?;
            Ok(Some(product))
        }
        None => Ok(None),
    }
}

/// Create a new product with its variants.
///
/// Initial stock values are stock-affecting events: one `Initial Stock`
/// ledger row is written for the scalar stock and one per variant, all in
/// the same transaction as the inserts.
pub async fn create(pool: &SqlitePool, data: ProductInput) -> RepoResult<Product> {
    validate(&data)?;
    let timestamp = data.updated_at.unwrap_or_else(now_secs);

    let mut tx = pool.begin().await?;

    let product_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, price, stock, category_id, image_url, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(timestamp)
    .fetch_one(&mut *tx)
    .await?;

    stock_history::append(&mut *tx, product_id, None, data.stock, data.stock, "Initial Stock")
        .await?;

    for variant in &data.variants {
        let variant_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO product_variants (product_id, name, stock, price_adjustment) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(product_id)
        .bind(&variant.name)
        .bind(variant.stock)
        .bind(variant.price_adjustment)
        .fetch_one(&mut *tx)
        .await?;

        stock_history::append(
            &mut *tx,
            product_id,
            Some(variant_id),
            variant.stock,
            variant.stock,
            "Initial Stock",
        )
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Update a product with last-writer-wins conflict detection.
///
/// The variant set is replaced wholesale: all prior rows are deleted and
/// the payload's variants reinserted with fresh ids. A changed scalar
/// stock produces a `Manual Adjustment` ledger row; every reinserted
/// variant gets a `Product Update` row.
pub async fn update(pool: &SqlitePool, id: i64, data: ProductInput) -> RepoResult<Product> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    let timestamp = data.updated_at.unwrap_or_else(now_secs);
    if timestamp < current.updated_at {
        return Err(RepoError::Conflict {
            current: serde_json::to_value(&current)
                .map_err(|e| RepoError::Database(e.to_string()))?,
        });
    }

    validate(&data)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE products SET name = ?, price = ?, stock = ?, category_id = ?, image_url = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(timestamp)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if data.stock != current.stock {
        stock_history::append(
            &mut *tx,
            id,
            None,
            data.stock - current.stock,
            data.stock,
            "Manual Adjustment",
        )
        .await?;
    }

    // Replace the full variant set; prior variant identities are not
    // preserved across an update
    sqlx::query("DELETE FROM product_variants WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for variant in &data.variants {
        let variant_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO product_variants (product_id, name, stock, price_adjustment) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(id)
        .bind(&variant.name)
        .bind(variant.stock)
        .bind(variant.price_adjustment)
        .fetch_one(&mut *tx)
        .await?;

        stock_history::append(
            &mut *tx,
            id,
            Some(variant_id),
            variant.stock,
            variant.stock,
            "Product Update",
        )
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete a product; variants go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(true)
}
