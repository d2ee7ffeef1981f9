//! Health Check API

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::response::HealthStatus;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - liveness plus a database ping
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthStatus>> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Health check database ping failed: {e}");
            "unavailable"
        }
    };

    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        database: database.to_string(),
    }))
}
