//! Plant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::api::MessageResponse;
use crate::core::ServerState;
use crate::db::models::{Plant, PlantCreate, PlantUpdate, StockUpdate};
use crate::db::repository::PlantRepository;
use crate::utils::{AppError, AppResult};

/// How many plants the popular report returns
const POPULAR_LIMIT: i64 = 10;

#[derive(Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to one category
    pub category: Option<String>,
}

/// GET /api/plants - list active plants, optionally filtered by category
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Plant>>> {
    let repo = PlantRepository::new(state.db.clone());
    let plants = match query.category {
        Some(ref category) if !category.is_empty() => repo.find_by_category(category).await?,
        _ => repo.find_all().await?,
    };
    Ok(Json(plants))
}

/// GET /api/plants/{id} - fetch one plant
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Plant>> {
    let repo = PlantRepository::new(state.db.clone());
    let plant = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Plant {} not found", id)))?;
    Ok(Json(plant))
}

/// POST /api/plants - create a plant
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PlantCreate>,
) -> AppResult<(StatusCode, Json<Plant>)> {
    let repo = PlantRepository::new(state.db.clone());
    let plant = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(plant)))
}

/// PUT /api/plants/{id} - update a plant
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PlantUpdate>,
) -> AppResult<Json<Plant>> {
    let repo = PlantRepository::new(state.db.clone());
    let plant = repo.update(&id, payload).await?;
    Ok(Json(plant))
}

/// PATCH /api/plants/{id}/stock - set the stock level directly
pub async fn set_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StockUpdate>,
) -> AppResult<Json<Plant>> {
    let repo = PlantRepository::new(state.db.clone());
    let plant = repo.set_stock(&id, payload.stock).await?;
    Ok(Json(plant))
}

/// DELETE /api/plants/{id} - soft delete a plant
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = PlantRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(MessageResponse::new("Plant deleted")))
}

/// GET /api/plants/admin/low-stock - plants running low, lowest first
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Plant>>> {
    let repo = PlantRepository::new(state.db.clone());
    let plants = repo.find_low_stock().await?;
    Ok(Json(plants))
}

/// GET /api/plants/admin/popular - most ordered plants
pub async fn popular(State(state): State<ServerState>) -> AppResult<Json<Vec<Plant>>> {
    let repo = PlantRepository::new(state.db.clone());
    let plants = repo.find_popular(POPULAR_LIMIT).await?;
    Ok(Json(plants))
}
