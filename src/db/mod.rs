//! Database Module
//!
//! Embedded SurrealDB connection and schema definitions.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "nursery";
const DATABASE: &str = "storefront";

/// Database service - owns the embedded database handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the embedded database at the given path and apply schema
    /// definitions.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB at {db_path})");

        Ok(Self { db })
    }
}

/// Schema definitions applied at startup (idempotent).
///
/// The unique index on `orderNumber` is the storage-level backstop for the
/// numbering allocator: a lost-update race between two concurrent creations
/// surfaces as an index violation instead of a duplicate number.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query("DEFINE INDEX IF NOT EXISTS order_number_unique ON TABLE order FIELDS orderNumber UNIQUE")
        .await?
        .check()?;
    db.query("DEFINE INDEX IF NOT EXISTS plant_category ON TABLE plant FIELDS category")
        .await?
        .check()?;
    Ok(())
}
