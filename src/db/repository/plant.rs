//! Plant Repository

use chrono::Utc;
use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Plant, PlantCreate, PlantUpdate};

const TABLE: &str = "plant";

/// Plants below this stock level show up in the low-stock report
const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Clone)]
pub struct PlantRepository {
    base: BaseRepository,
}

impl PlantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active plants ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plant WHERE isActive = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Find plant by id (active or not)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Plant>> {
        let plant: Option<Plant> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(plant)
    }

    /// Find active plants in a category, ordered by name
    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<Plant>> {
        // Links are stored in the string form the models serialize to
        let cat = record_id("category", category_id).to_string();
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plant WHERE category = $cat AND isActive = true ORDER BY name")
            .bind(("cat", cat))
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Create a new plant
    pub async fn create(&self, data: PlantCreate) -> RepoResult<Plant> {
        let category: RecordId = record_id("category", &data.category);

        // The category link must point at an existing record
        let existing: Option<crate::db::models::Category> =
            self.base.db().select(category.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                data.category
            )));
        }

        let stock = data.stock.unwrap_or(0);
        if stock < 0 {
            return Err(RepoError::Validation(
                "Stock cannot be negative".to_string(),
            ));
        }

        let plant = Plant {
            id: None,
            name: data.name,
            category,
            height: data.height,
            watering: data.watering,
            light: data.light,
            uses: data.uses,
            description: data.description,
            image: data.image.unwrap_or_else(|| "default-plant.jpg".to_string()),
            stock,
            popularity: 0,
            is_active: true,
            created_at: Some(Utc::now()),
        };

        let created: Option<Plant> = self.base.db().create(TABLE).content(plant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create plant".to_string()))
    }

    /// Update a plant
    pub async fn update(&self, id: &str, data: PlantUpdate) -> RepoResult<Plant> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Plant {} not found", id)))?;

        if let Some(stock) = data.stock
            && stock < 0
        {
            return Err(RepoError::Validation(
                "Stock cannot be negative".to_string(),
            ));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PlantUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            /// String form, matching how the model serializes the link
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            height: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            watering: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            light: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            uses: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            stock: Option<i64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = PlantUpdateDb {
            name: data.name,
            category: data.category.map(|c| record_id("category", &c).to_string()),
            height: data.height,
            watering: data.watering,
            light: data.light,
            uses: data.uses,
            description: data.description,
            image: data.image,
            stock: data.stock,
            is_active: data.is_active,
        };

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $plant MERGE $data")
            .bind(("plant", rid))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Plant {} not found", id)))
    }

    /// Set the stock level directly (admin operation)
    pub async fn set_stock(&self, id: &str, stock: i64) -> RepoResult<Plant> {
        if stock < 0 {
            return Err(RepoError::Validation(
                "Stock cannot be negative".to_string(),
            ));
        }

        let rid = record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $plant SET stock = $stock RETURN AFTER")
            .bind(("plant", rid))
            .bind(("stock", stock))
            .await?;
        let updated: Vec<Plant> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Plant {} not found", id)))
    }

    /// Soft delete a plant
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Plant {} not found", id)))?;

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $plant SET isActive = false")
            .bind(("plant", rid))
            .await?;

        Ok(true)
    }

    /// Active plants running low on stock, lowest first
    pub async fn find_low_stock(&self) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query("SELECT * FROM plant WHERE stock < $threshold AND isActive = true ORDER BY stock")
            .bind(("threshold", LOW_STOCK_THRESHOLD))
            .await?
            .take(0)?;
        Ok(plants)
    }

    /// Most ordered active plants
    pub async fn find_popular(&self, limit: i64) -> RepoResult<Vec<Plant>> {
        let plants: Vec<Plant> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM plant WHERE isActive = true ORDER BY popularity DESC LIMIT {}",
                limit.max(0)
            ))
            .await?
            .take(0)?;
        Ok(plants)
    }
}
