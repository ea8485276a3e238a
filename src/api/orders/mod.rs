//! Order API Module

mod handler;

use axum::{Router, routing::get, routing::patch};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Admin reports (must be before /{id} to avoid path conflicts)
        .route("/admin/statistics", get(handler::statistics))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", patch(handler::set_status))
}
