//! Inventory Store
//!
//! Stock reservation and restoration for plants. Reservations are applied
//! with a conditional update so stock can never go negative, even when two
//! orders race for the last units.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;
use tracing::warn;

use crate::db::models::Plant;
use crate::db::repository::record_id;
use crate::utils::AppError;

/// Inventory error types
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Plant with ID {0} not found")]
    PlantNotFound(String),

    #[error("Not enough stock for {name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for InventoryError {
    fn from(err: surrealdb::Error) -> Self {
        InventoryError::Database(err.to_string())
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::PlantNotFound(msg) => {
                AppError::Validation(format!("Plant with ID {} not found", msg))
            }
            InventoryError::InsufficientStock { .. } => AppError::Validation(err.to_string()),
            InventoryError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[derive(Clone)]
pub struct InventoryStore {
    db: Surreal<Db>,
}

impl InventoryStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Reserve `quantity` units of a plant's stock.
    ///
    /// The decrement only applies when enough stock remains, so a concurrent
    /// reservation cannot push the level below zero. Returns the plant as it
    /// was after the decrement.
    pub async fn reserve(&self, plant_id: &str, quantity: i64) -> Result<Plant, InventoryError> {
        let rid = record_id("plant", plant_id);
        let mut result = self
            .db
            .query("UPDATE $plant SET stock -= $qty WHERE stock >= $qty RETURN AFTER")
            .bind(("plant", rid.clone()))
            .bind(("qty", quantity))
            .await?;
        let updated: Vec<Plant> = result.take(0)?;

        if let Some(plant) = updated.into_iter().next() {
            return Ok(plant);
        }

        // The conditional update matched nothing: either the plant does not
        // exist or its stock is too low. Re-read to tell the two apart.
        let plant: Option<Plant> = self.db.select(rid).await?;
        match plant {
            Some(plant) => Err(InventoryError::InsufficientStock {
                name: plant.name,
                available: plant.stock,
                requested: quantity,
            }),
            None => Err(InventoryError::PlantNotFound(plant_id.to_string())),
        }
    }

    /// Return `quantity` units to a plant's stock.
    ///
    /// Returns the new stock level, or `None` when the plant record is gone;
    /// a missing plant is logged but does not fail the caller, since the
    /// order-side state change must still go through.
    pub async fn restore(
        &self,
        plant_id: &str,
        quantity: i64,
    ) -> Result<Option<i64>, InventoryError> {
        let rid = record_id("plant", plant_id);
        let mut result = self
            .db
            .query("UPDATE $plant SET stock += $qty RETURN AFTER")
            .bind(("plant", rid))
            .bind(("qty", quantity))
            .await?;
        let updated: Vec<Plant> = result.take(0)?;

        match updated.into_iter().next() {
            Some(plant) => Ok(Some(plant.stock)),
            None => {
                warn!("Stock restore skipped: plant {} no longer exists", plant_id);
                Ok(None)
            }
        }
    }

    /// Bump a plant's popularity counter by the ordered quantity
    pub async fn increment_popularity(
        &self,
        plant_id: &str,
        quantity: i64,
    ) -> Result<(), InventoryError> {
        let rid = record_id("plant", plant_id);
        self.db
            .query("UPDATE $plant SET popularity += $qty")
            .bind(("plant", rid))
            .bind(("qty", quantity))
            .await?;
        Ok(())
    }
}
