//! Checkout API Handler

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::{RepoError, sale};
use crate::utils::{AppError, AppResult};
use shared::models::CheckoutRequest;
use shared::response::CheckoutResult;

/// POST /api/checkout - process a cart atomically
///
/// Malformed carts are a 400; anything failing inside the transaction has
/// already rolled back and surfaces as a generic 500 — the terminal may
/// requeue the cart as an offline action.
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResult>> {
    let sale_id = sale::checkout(&state.pool, &payload)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::validation(msg),
            other => AppError::internal(format!("Checkout failed: {other}")),
        })?;

    Ok(Json(CheckoutResult {
        success: true,
        sale_id,
    }))
}
