//! Statistics Repository
//!
//! Read-only aggregation over sales and products for the dashboard.
//! Calling it twice with no intervening writes returns identical values.

use super::RepoResult;
use shared::models::{DailyRevenue, RecentSale, Stats};
use sqlx::SqlitePool;

/// Number of recent sales returned
const RECENT_SALES_LIMIT: i64 = 5;

/// Aggregate dashboard statistics.
///
/// `low_stock_threshold` counts products whose *scalar* stock is below the
/// threshold; variant stock is deliberately not aggregated here (the
/// terminal computes variant-aware totals for its own display).
pub async fn stats(pool: &SqlitePool, low_stock_threshold: i64) -> RepoResult<Stats> {
    let revenue: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_amount), 0.0) FROM sales")
        .fetch_one(pool)
        .await?;

    let sales_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(pool)
        .await?;

    let low_stock_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock < ?")
            .bind(low_stock_threshold)
            .fetch_one(pool)
            .await?;

    let recent_sales = sqlx::query_as::<_, RecentSale>(
        "SELECT s.id, s.total_amount, s.timestamp, \
                (SELECT COUNT(*) FROM sale_items WHERE sale_id = s.id) AS item_count \
         FROM sales s \
         ORDER BY s.timestamp DESC, s.id DESC \
         LIMIT ?",
    )
    .bind(RECENT_SALES_LIMIT)
    .fetch_all(pool)
    .await?;

    // Trailing seven days, ascending; days without sales are omitted
    let daily_revenue = sqlx::query_as::<_, DailyRevenue>(
        "SELECT date(timestamp) AS date, SUM(total_amount) AS revenue \
         FROM sales \
         WHERE timestamp >= date('now', '-7 days') \
         GROUP BY date \
         ORDER BY date ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(Stats {
        revenue,
        sales_count,
        low_stock_count,
        recent_sales,
        daily_revenue,
    })
}
