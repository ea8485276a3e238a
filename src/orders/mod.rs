//! Order Domain
//!
//! Order numbering and the lifecycle service driving creation, status
//! transitions and deletion with their inventory side effects.

pub mod lifecycle;
pub mod numbering;

pub use lifecycle::{CreateOrderRequest, LifecycleError, OrderItemRequest, OrderLifecycle};
pub use numbering::OrderNumbering;
