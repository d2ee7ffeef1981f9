//! Statistics Model

use serde::{Deserialize, Serialize};

/// Dashboard statistics response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub revenue: f64,
    #[serde(rename = "salesCount")]
    pub sales_count: i64,
    #[serde(rename = "lowStockCount")]
    pub low_stock_count: i64,
    #[serde(rename = "recentSales")]
    pub recent_sales: Vec<RecentSale>,
    #[serde(rename = "dailyRevenue")]
    pub daily_revenue: Vec<DailyRevenue>,
}

/// Recent sale with its line-item count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecentSale {
    pub id: i64,
    pub total_amount: f64,
    pub timestamp: String,
    pub item_count: i64,
}

/// Revenue for one calendar day; days without sales are omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyRevenue {
    pub date: String,
    pub revenue: f64,
}
