//! Nursery Storefront Server
//!
//! # Architecture Overview
//!
//! A small catalog server for a plant nursery: a public browsing/ordering
//! flow and an authenticated admin back office, backed by an embedded
//! SurrealDB document store.
//!
//! - **Orders** (`orders`): order lifecycle manager and order numbering
//! - **Inventory** (`inventory`): atomic stock reserve/restore
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Auth** (`auth`): JWT bearer-token validation for the back office
//! - **HTTP API** (`api`): RESTful API routers and handlers
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── core/       # Config, state, HTTP server
//! ├── auth/       # JWT validation, middleware
//! ├── api/        # HTTP routes and handlers
//! ├── db/         # Database layer (models, repositories)
//! ├── inventory/  # Stock bookkeeping
//! ├── orders/     # Order lifecycle and numbering
//! └── utils/      # Errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use inventory::{InventoryError, InventoryStore};
pub use orders::{CreateOrderRequest, LifecycleError, OrderLifecycle, OrderNumbering};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    _   __
   / | / /_  ______________  _______  __
  /  |/ / / / / ___/ ___/ _ \/ ___/ / / /
 / /|  / /_/ / /  (__  )  __/ /  / /_/ /
/_/ |_/\__,_/_/  /____/\___/_/   \__, /
                                /____/
    "#
    );
}
