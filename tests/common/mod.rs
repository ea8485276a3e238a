//! Shared test fixtures
//!
//! All integration tests run against the in-memory SurrealDB engine with the
//! same schema the server defines at startup.

use nursery_server::core::{Config, ServerState};
use nursery_server::db::define_schema;
use nursery_server::db::models::{Category, CategoryCreate, Plant, PlantCreate};
use nursery_server::db::repository::{CategoryRepository, PlantRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Open a fresh in-memory database with the server schema applied
pub async fn mem_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("Failed to open in-memory database");
    db.use_ns("nursery")
        .use_db("storefront")
        .await
        .expect("Failed to select namespace");
    define_schema(&db).await.expect("Failed to define schema");
    db
}

/// Build a server state around a fresh in-memory database
pub async fn test_state() -> ServerState {
    let mut config = Config::with_overrides("/tmp/nursery-test", 0);
    config.jwt.secret = "integration-test-secret-32-chars-min!".to_string();
    ServerState::with_db(config, mem_db().await)
}

/// Seed one category
pub async fn seed_category(db: &Surreal<Db>, name: &str) -> Category {
    let repo = CategoryRepository::new(db.clone());
    repo.create(CategoryCreate {
        name: name.to_string(),
        icon: None,
    })
    .await
    .expect("Failed to seed category")
}

/// Seed one plant with the given stock in the given category
pub async fn seed_plant(db: &Surreal<Db>, category: &Category, name: &str, stock: i64) -> Plant {
    let repo = PlantRepository::new(db.clone());
    let category_id = category
        .id
        .as_ref()
        .expect("Seeded category has no id")
        .key()
        .to_string();
    repo.create(PlantCreate {
        name: name.to_string(),
        category: category_id,
        height: None,
        watering: None,
        light: None,
        uses: None,
        description: None,
        image: None,
        stock: Some(stock),
    })
    .await
    .expect("Failed to seed plant")
}

/// Bare record key of a stored entity id
pub fn key_of(id: &Option<surrealdb::RecordId>) -> String {
    id.as_ref().expect("Record has no id").key().to_string()
}
