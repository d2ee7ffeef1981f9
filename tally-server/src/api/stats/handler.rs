//! Statistics API Handler

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::stats;
use crate::utils::AppResult;
use shared::models::Stats;

/// Default low-stock threshold when the caller supplies none
const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub threshold: Option<i64>,
}

/// GET /api/stats?threshold=N - dashboard statistics
pub async fn get_stats(
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<Stats>> {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let stats = stats::stats(&state.pool, threshold).await?;
    Ok(Json(stats))
}
