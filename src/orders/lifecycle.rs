//! Order Lifecycle
//!
//! The lifecycle manager owns every order state change and its inventory
//! side effect: creation reserves stock, cancellation restores it, and
//! terminal states freeze the order.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use validator::Validate;

use crate::db::models::{Order, OrderItem, OrderStatus};
use crate::db::repository::{
    OrderFilter, OrderRepository, PlantRepository, RepoError, record_id,
};
use crate::inventory::{InventoryError, InventoryStore};
use crate::orders::OrderNumbering;
use crate::utils::AppError;

/// Lifecycle error types
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Validation(String),

    #[error("Plant with ID {0} not found")]
    PlantNotFound(String),

    #[error("Not enough stock for {name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Cannot change status of a {0} order")]
    FrozenOrder(OrderStatus),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Database error: {0}")]
    Storage(String),
}

impl From<InventoryError> for LifecycleError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::PlantNotFound(id) => LifecycleError::PlantNotFound(id),
            InventoryError::InsufficientStock {
                name,
                available,
                requested,
            } => LifecycleError::InsufficientStock {
                name,
                available,
                requested,
            },
            InventoryError::Database(msg) => LifecycleError::Storage(msg),
        }
    }
}

impl From<RepoError> for LifecycleError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => LifecycleError::OrderNotFound(msg),
            RepoError::Validation(msg) => LifecycleError::Validation(msg),
            RepoError::Duplicate(msg) | RepoError::Database(msg) => LifecycleError::Storage(msg),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(msg) => AppError::Validation(msg),
            LifecycleError::PlantNotFound(_)
            | LifecycleError::InsufficientStock { .. }
            | LifecycleError::FrozenOrder(_)
            | LifecycleError::InvalidStatus(_) => AppError::Validation(err.to_string()),
            LifecycleError::OrderNotFound(_) => AppError::NotFound(err.to_string()),
            LifecycleError::Storage(msg) => AppError::Database(msg),
        }
    }
}

/// One requested line of a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[validate(length(min = 1, message = "Plant id is required"))]
    pub plant: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
}

/// Payload for placing a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Customer phone is required"))]
    pub customer_phone: String,
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
    pub notes: Option<String>,
}

pub struct OrderLifecycle {
    orders: OrderRepository,
    plants: PlantRepository,
    inventory: InventoryStore,
    numbering: OrderNumbering,
    /// Serializes number allocation with order insertion so two concurrent
    /// creations cannot allocate the same daily counter.
    create_lock: Mutex<()>,
}

impl OrderLifecycle {
    pub fn new(db: Surreal<Db>) -> Self {
        let orders = OrderRepository::new(db.clone());
        Self {
            numbering: OrderNumbering::new(orders.clone()),
            plants: PlantRepository::new(db.clone()),
            inventory: InventoryStore::new(db),
            orders,
            create_lock: Mutex::new(()),
        }
    }

    /// Place a new order.
    ///
    /// Stock is reserved item by item; if a later item fails, reservations
    /// already applied stay applied and the error surfaces to the caller.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, LifecycleError> {
        request
            .validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;

        let _guard = self.create_lock.lock().await;

        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let plant = self
                .plants
                .find_by_id(&line.plant)
                .await?
                .ok_or_else(|| LifecycleError::PlantNotFound(line.plant.clone()))?;

            self.inventory.reserve(&line.plant, line.quantity).await?;
            self.inventory
                .increment_popularity(&line.plant, line.quantity)
                .await?;

            items.push(OrderItem {
                plant: record_id("plant", &line.plant),
                plant_name: plant.name,
                quantity: line.quantity,
                price: 0.0,
            });
        }

        let now = Utc::now();
        let order_number = self.numbering.allocate(now.date_naive()).await?;

        let order = Order {
            id: None,
            order_number,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            ordered_at: now,
            status: OrderStatus::Pending,
            items,
            total_amount: 0.0,
            notes: request.notes,
        };

        let created = self.orders.insert(order).await?;
        info!("Order {} created", created.order_number);
        Ok(created)
    }

    /// Fetch one order
    pub async fn get_order(&self, id: &str) -> Result<Order, LifecycleError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| LifecycleError::OrderNotFound(id.to_string()))
    }

    /// List orders matching the filter, newest first
    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, LifecycleError> {
        Ok(self.orders.find_with_filter(filter).await?)
    }

    /// Move an order to a new status.
    ///
    /// Terminal orders are frozen. Transitioning into `cancelled` from any
    /// live state returns the reserved stock to inventory.
    pub async fn set_status(&self, id: &str, status: &str) -> Result<Order, LifecycleError> {
        let new_status = status
            .parse::<OrderStatus>()
            .map_err(|_| LifecycleError::InvalidStatus(status.to_string()))?;

        let order = self.get_order(id).await?;

        if order.status.is_terminal() {
            return Err(LifecycleError::FrozenOrder(order.status));
        }

        if new_status == OrderStatus::Cancelled && order.status != OrderStatus::Cancelled {
            self.restore_items(&order).await?;
            info!("Order {} cancelled, stock restored", order.order_number);
        }

        Ok(self.orders.update_status(id, new_status).await?)
    }

    /// Delete an order outright.
    ///
    /// Reserved stock goes back to inventory unless the order was already
    /// cancelled (its reservation was restored at cancellation time).
    pub async fn delete_order(&self, id: &str) -> Result<(), LifecycleError> {
        let order = self.get_order(id).await?;

        if order.status != OrderStatus::Cancelled {
            self.restore_items(&order).await?;
        }

        self.orders.delete(id).await?;
        info!("Order {} deleted", order.order_number);
        Ok(())
    }

    /// Count orders, optionally restricted to one status
    pub async fn count_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<i64, LifecycleError> {
        Ok(self.orders.count_by_status(status).await?)
    }

    async fn restore_items(&self, order: &Order) -> Result<(), LifecycleError> {
        for item in &order.items {
            let plant_id = item.plant.key().to_string();
            self.inventory.restore(&plant_id, item.quantity).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Rosa".to_string(),
            customer_phone: "5551234".to_string(),
            items: vec![OrderItemRequest {
                plant: "plant:abc".to_string(),
                quantity: 1,
            }],
            notes: None,
        }
    }

    #[test]
    fn well_formed_request_validates() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn empty_items_fail_validation() {
        let mut request = valid_request();
        request.items.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn nested_item_constraints_are_enforced() {
        let mut request = valid_request();
        request.items[0].quantity = 0;
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.items[0].plant = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn missing_customer_fields_fail_validation() {
        let mut request = valid_request();
        request.customer_name = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.customer_phone = String::new();
        assert!(request.validate().is_err());
    }
}
