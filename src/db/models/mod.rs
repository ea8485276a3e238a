//! Database models
//!
//! Document shapes stored in SurrealDB plus their create/update DTOs. Field
//! names serialize as camelCase, matching the public API wire format.

pub mod category;
pub mod order;
pub mod plant;
pub mod serde_helpers;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{Order, OrderItem, OrderStatus};
pub use plant::{Plant, PlantCreate, PlantUpdate, StockUpdate};
