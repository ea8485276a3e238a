//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::MessageResponse;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate, Plant};
use crate::db::repository::{CategoryRepository, PlantRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/categories - list active categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.find_all().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - fetch one category
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// GET /api/categories/{id}/plants - active plants in one category
pub async fn list_plants(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Plant>>> {
    let categories = CategoryRepository::new(state.db.clone());
    categories
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;

    let plants = PlantRepository::new(state.db.clone());
    Ok(Json(plants.find_by_category(&id).await?))
}

/// POST /api/categories - create a category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id} - update a category
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - soft delete a category
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = CategoryRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
