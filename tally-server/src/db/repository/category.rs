//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryInput};
use shared::util::now_secs;
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, updated_at FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, updated_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, updated_at FROM categories WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

/// Create a new category, stamping `updated_at` with the caller-supplied
/// timestamp (offline replay) or the server clock.
pub async fn create(pool: &SqlitePool, data: CategoryInput) -> RepoResult<Category> {
    // Check duplicate name; the UNIQUE constraint is the backstop
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            data.name
        )));
    }

    let timestamp = data.updated_at.unwrap_or_else(now_secs);
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (name, updated_at) VALUES (?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(timestamp)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

/// Update a category with last-writer-wins conflict detection.
///
/// A `client_updated_at` older than the stored token means another
/// terminal wrote in between; the write is rejected and the current row
/// returned so the operator can decide.
pub async fn update(pool: &SqlitePool, id: i64, data: CategoryInput) -> RepoResult<Category> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    let timestamp = data.updated_at.unwrap_or_else(now_secs);
    if timestamp < current.updated_at {
        return Err(RepoError::Conflict {
            current: serde_json::to_value(&current)
                .map_err(|e| RepoError::Database(e.to_string()))?,
        });
    }

    // Check duplicate name if changing
    if data.name != current.name && find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            data.name
        )));
    }

    sqlx::query("UPDATE categories SET name = ?, updated_at = ? WHERE id = ?")
        .bind(&data.name)
        .bind(timestamp)
        .bind(id)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category. Fails while products still reference it — this is a
/// referential-integrity error, not a conflict, and never cascades.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM products WHERE category_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    if count > 0 {
        return Err(RepoError::Validation(
            "Cannot delete category while products are linked to it.".into(),
        ));
    }

    let rows = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testing::memory_pool;

    fn input(name: &str, updated_at: Option<i64>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            updated_at,
        }
    }

    #[tokio::test]
    async fn create_stamps_supplied_timestamp() {
        let pool = memory_pool().await;
        let cat = create(&pool, input("Coffee", Some(1000))).await.unwrap();
        assert_eq!(cat.name, "Coffee");
        assert_eq!(cat.updated_at, 1000);
    }

    #[tokio::test]
    async fn create_defaults_timestamp_to_now() {
        let pool = memory_pool().await;
        let before = now_secs();
        let cat = create(&pool, input("Coffee", None)).await.unwrap();
        assert!(cat.updated_at >= before);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name() {
        let pool = memory_pool().await;
        create(&pool, input("Coffee", None)).await.unwrap();
        let err = create(&pool, input("Coffee", None)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn stale_update_is_rejected_with_current_row() {
        let pool = memory_pool().await;
        let cat = create(&pool, input("Coffee", Some(1000))).await.unwrap();

        let err = update(&pool, cat.id, input("Tea", Some(900)))
            .await
            .unwrap_err();
        match err {
            RepoError::Conflict { current } => {
                assert_eq!(current["updated_at"], 1000);
                assert_eq!(current["name"], "Coffee");
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        // Stored row unchanged
        let stored = find_by_id(&pool, cat.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Coffee");
        assert_eq!(stored.updated_at, 1000);
    }

    #[tokio::test]
    async fn fresh_update_wins_and_advances_token() {
        let pool = memory_pool().await;
        let cat = create(&pool, input("Coffee", Some(1000))).await.unwrap();

        let updated = update(&pool, cat.id, input("Tea", Some(2000))).await.unwrap();
        assert_eq!(updated.name, "Tea");
        assert_eq!(updated.updated_at, 2000);
    }

    #[tokio::test]
    async fn equal_timestamp_is_accepted() {
        // `client_updated_at >= current` succeeds; only strictly older loses
        let pool = memory_pool().await;
        let cat = create(&pool, input("Coffee", Some(1000))).await.unwrap();
        let updated = update(&pool, cat.id, input("Tea", Some(1000))).await.unwrap();
        assert_eq!(updated.name, "Tea");
    }

    #[tokio::test]
    async fn delete_refuses_while_referenced() {
        let pool = memory_pool().await;
        let cat = create(&pool, input("Coffee", None)).await.unwrap();
        sqlx::query("INSERT INTO products (name, price, stock, category_id) VALUES ('Espresso', 2.0, 5, ?)")
            .bind(cat.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = delete(&pool, cat.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(find_by_id(&pool, cat.id).await.unwrap().is_some());

        // Unlink, then delete succeeds
        sqlx::query("UPDATE products SET category_id = NULL")
            .execute(&pool)
            .await
            .unwrap();
        assert!(delete(&pool, cat.id).await.unwrap());
        assert!(find_by_id(&pool, cat.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeded_categories_present() {
        let pool = memory_pool().await;
        let all = find_all(&pool).await.unwrap();
        assert!(all.iter().any(|c| c.name == "Beverages"));
        assert_eq!(all.len(), 5);
    }
}
