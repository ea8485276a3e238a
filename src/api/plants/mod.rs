//! Plant API Module

mod handler;

use axum::{Router, routing::get, routing::patch};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/plants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Admin reports (must be before /{id} to avoid path conflicts)
        .route("/admin/low-stock", get(handler::low_stock))
        .route("/admin/popular", get(handler::popular))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/stock", patch(handler::set_stock))
}
