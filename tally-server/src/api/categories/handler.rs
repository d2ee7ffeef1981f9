//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::{AppError, AppResult};
use shared::models::{Category, CategoryInput};
use shared::response::{CreateResult, DeleteResult, UpdateResult};

/// GET /api/categories - list all categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id - fetch one category
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;
    Ok(Json(category))
}

/// POST /api/categories - create a category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryInput>,
) -> AppResult<Json<CreateResult>> {
    let category = category::create(&state.pool, payload).await?;
    Ok(Json(CreateResult {
        id: category.id,
        updated_at: category.updated_at,
    }))
}

/// PUT /api/categories/:id - update a category (409 on stale updated_at)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryInput>,
) -> AppResult<Json<UpdateResult>> {
    let category = category::update(&state.pool, id, payload).await?;
    Ok(Json(UpdateResult {
        success: true,
        updated_at: category.updated_at,
    }))
}

/// DELETE /api/categories/:id - delete a category (400 while referenced)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResult>> {
    let success = category::delete(&state.pool, id).await?;
    Ok(Json(DeleteResult { success }))
}
