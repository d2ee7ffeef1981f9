//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{product, stock_history};
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductInput, StockHistory};
use shared::response::{CreateResult, DeleteResult, UpdateResult};

/// GET /api/products - list all products with nested variants
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - fetch one product
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

/// POST /api/products - create a product with its variants
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<CreateResult>> {
    let product = product::create(&state.pool, payload).await?;
    Ok(Json(CreateResult {
        id: product.id,
        updated_at: product.updated_at,
    }))
}

/// PUT /api/products/:id - update a product, replacing the variant set
/// (409 on stale updated_at)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<UpdateResult>> {
    let product = product::update(&state.pool, id, payload).await?;
    Ok(Json(UpdateResult {
        success: true,
        updated_at: product.updated_at,
    }))
}

/// DELETE /api/products/:id - delete a product and its variants
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResult>> {
    let success = product::delete(&state.pool, id).await?;
    Ok(Json(DeleteResult { success }))
}

/// GET /api/products/:id/history - stock ledger, newest first
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<StockHistory>>> {
    let rows = stock_history::history(&state.pool, id).await?;
    Ok(Json(rows))
}
