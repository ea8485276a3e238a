//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::api::MessageResponse;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, Plant};
use crate::db::repository::{OrderFilter, PlantRepository};
use crate::orders::CreateOrderRequest;
use crate::utils::{AppError, AppResult};

/// How many plants the statistics report names
const STATISTICS_POPULAR_LIMIT: i64 = 5;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    /// Inclusive lower bound, YYYY-MM-DD
    pub start_date: Option<String>,
    /// Inclusive upper bound, YYYY-MM-DD
    pub end_date: Option<String>,
}

/// POST /api/orders - place a new order (public)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.lifecycle.create_order(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - list orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let filter = build_filter(query)?;
    let orders = state.lifecycle.list_orders(filter).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - fetch one order
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.get_order(&id).await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// PATCH /api/orders/{id}/status - move an order to a new status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.set_status(&id, &payload.status).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id} - delete an order, restoring its stock
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.lifecycle.delete_order(&id).await?;
    Ok(Json(MessageResponse::new("Order deleted")))
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub shipped: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub popular_plants: Vec<Plant>,
}

/// GET /api/orders/admin/statistics - order counts and top plants
pub async fn statistics(State(state): State<ServerState>) -> AppResult<Json<StatisticsResponse>> {
    let lifecycle = &state.lifecycle;

    let total = lifecycle.count_orders(None).await?;
    let pending = lifecycle.count_orders(Some(OrderStatus::Pending)).await?;
    let approved = lifecycle.count_orders(Some(OrderStatus::Approved)).await?;
    let shipped = lifecycle.count_orders(Some(OrderStatus::Shipped)).await?;
    let completed = lifecycle.count_orders(Some(OrderStatus::Completed)).await?;
    let cancelled = lifecycle.count_orders(Some(OrderStatus::Cancelled)).await?;

    let plants = PlantRepository::new(state.db.clone());
    let popular_plants = plants.find_popular(STATISTICS_POPULAR_LIMIT).await?;

    Ok(Json(StatisticsResponse {
        total,
        pending,
        approved,
        shipped,
        completed,
        cancelled,
        popular_plants,
    }))
}

/// Turn the raw query string parameters into a repository filter.
///
/// A `status` of "all" (or empty) means no status restriction. Dates arrive
/// as plain days and expand to inclusive UTC bounds covering the whole day.
fn build_filter(query: ListQuery) -> Result<OrderFilter, AppError> {
    let status = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|_| AppError::validation(format!("Invalid status: {}", raw)))?,
        ),
    };

    let start_date = query
        .start_date
        .filter(|s| !s.is_empty())
        .map(|s| parse_day_bound(&s, false))
        .transpose()?;
    let end_date = query
        .end_date
        .filter(|s| !s.is_empty())
        .map(|s| parse_day_bound(&s, true))
        .transpose()?;

    Ok(OrderFilter {
        status,
        customer_name: query.customer_name.filter(|s| !s.is_empty()),
        customer_phone: query.customer_phone.filter(|s| !s.is_empty()),
        start_date,
        end_date,
    })
}

/// Parse YYYY-MM-DD into the first or last instant of that UTC day
fn parse_day_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date: {}", raw)))?;
    let time = if end_of_day {
        NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| AppError::internal("Invalid time construction"))?
    } else {
        NaiveTime::MIN
    };
    Ok(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc))
}
