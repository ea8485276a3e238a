//! Repository Module
//!
//! CRUD access to the SurrealDB tables. One repository struct per table,
//! sharing a [`BaseRepository`] holding the database handle.

pub mod category;
pub mod order;
pub mod plant;

pub use category::CategoryRepository;
pub use order::{OrderFilter, OrderRepository};
pub use plant::PlantRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a [`RecordId`] from either a "table:key" string or a bare key.
///
/// API callers send both forms; the bare form is scoped to the given table.
pub fn record_id(table: &str, id: &str) -> RecordId {
    id.parse::<RecordId>()
        .ok()
        .filter(|rid| rid.table() == table)
        .unwrap_or_else(|| RecordId::from_table_key(table, id))
}

/// Base repository with a shared database handle
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
