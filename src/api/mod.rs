//! API Routes
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`categories`] - category catalog management
//! - [`plants`] - plant catalog and stock management
//! - [`orders`] - order placement and back-office lifecycle
//!
//! Public routes (no token): health, catalog reads, and order placement.
//! Everything else sits behind the bearer-token guard.

pub mod categories;
pub mod health;
pub mod orders;
pub mod plants;

use axum::Router;
use serde::Serialize;

use crate::core::ServerState;

/// Simple `{ "message": ... }` body for deletions and similar acks
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Assemble the full application router
pub fn build_app() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(plants::router())
        .merge(orders::router())
}
