//! Category Repository

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active categories ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE isActive = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let category: Option<Category> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(category)
    }

    /// Find an active category by name
    pub async fn find_active_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name AND isActive = true LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        // Name must be unique among active categories
        if self.find_active_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category with this name already exists: {}",
                data.name
            )));
        }

        let category = Category {
            id: None,
            name: data.name,
            icon: data.icon,
            is_active: true,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_active_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Another category with this name already exists: {}",
                new_name
            )));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct CategoryUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            icon: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = CategoryUpdateDb {
            name: data.name,
            icon: data.icon,
            is_active: data.is_active,
        };

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $category MERGE $data")
            .bind(("category", rid.clone()))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Soft delete a category
    ///
    /// Refused while any active plant still references it.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(TABLE, id);

        let existing = self.find_by_id(id).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Category {} not found", id)));
        }

        // Links are stored in the string form the models serialize to
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM plant WHERE category = $cat AND isActive = true GROUP ALL")
            .bind(("cat", rid.to_string()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;

        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Cannot delete category that has plants. Please reassign or delete the plants first."
                    .to_string(),
            ));
        }

        self.base
            .db()
            .query("UPDATE $category SET isActive = false")
            .bind(("category", rid))
            .await?;

        Ok(true)
    }
}
