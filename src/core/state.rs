use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderLifecycle;
use crate::utils::AppError;

/// Shared server state
///
/// Holds the configuration, the embedded database handle and the services
/// every request handler needs. `Clone` is shallow; the handle and services
/// are shared through `Arc` or internal reference counting. There is no
/// ambient global: the database connection is acquired once at startup and
/// passed into repositories by clone.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT validation service
    pub jwt_service: Arc<JwtService>,
    /// Order lifecycle manager
    pub lifecycle: Arc<OrderLifecycle>,
}

impl ServerState {
    /// Build a state around an already-opened database handle.
    ///
    /// Used by [`initialize`](Self::initialize) and by tests that run against
    /// the in-memory engine.
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let lifecycle = Arc::new(OrderLifecycle::new(db.clone()));

        Self {
            config,
            db,
            jwt_service,
            lifecycle,
        }
    }

    /// Initialize the server state:
    ///
    /// 1. ensure the data directory layout exists
    /// 2. open the embedded database (`data_dir/database/nursery.db`)
    /// 3. wire up the JWT service and the order lifecycle manager
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_data_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create data directory: {e}")))?;

        let db_path = config.database_dir().join("nursery.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::with_db(config.clone(), db_service.db))
    }

    /// Get a database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
