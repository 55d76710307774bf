//! # Category Repository
//!
//! CRUD for product categories. Deleting a category that products still
//! reference fails with [`DbError::ForeignKeyViolation`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::validation::{normalize_description, validate_name};
use kasir_core::{Category, CategoryInput};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRecord {
    id: i64,
    name: String,
    description: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: r.id,
            name: r.name,
            description: r.description,
        }
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let records: Vec<CategoryRecord> =
            sqlx::query_as("SELECT id, name, description FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        debug!(count = records.len(), "Listed categories");
        Ok(records.into_iter().map(Category::from).collect())
    }

    /// Gets a category by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - Category not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let record: Option<CategoryRecord> =
            sqlx::query_as("SELECT id, name, description FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record.map(Category::from))
    }

    /// Inserts a new category and returns it with its assigned id.
    pub async fn create(&self, input: &CategoryInput) -> DbResult<Category> {
        let name = validate_name("name", &input.name)?;
        let description = normalize_description(input.description.as_deref())?;
        let now = Utc::now();

        debug!(name = %name, "Inserting category");

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name,
            description,
        })
    }

    /// Replaces a category's name and description.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, id: i64, input: &CategoryInput) -> DbResult<Category> {
        let name = validate_name("name", &input.name)?;
        let description = normalize_description(input.description.as_deref())?;

        debug!(id = %id, name = %name, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&name)
        .bind(&description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(Category {
            id,
            name,
            description,
        })
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Products still use it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kasir_core::{CoreError, Money, ProductInput};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn input(name: &str, description: Option<&str>) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_category_crud() {
        let db = setup().await;
        let repo = db.categories();

        let created = repo.create(&input(" Minuman ", Some("Dingin"))).await.unwrap();
        assert_eq!(created.name, "Minuman");
        assert_eq!(created.description.as_deref(), Some("Dingin"));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let updated = repo
            .update(created.id, &input("Minuman Dingin", None))
            .await
            .unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(updated));

        repo.create(&input("Makanan", None)).await.unwrap();
        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Minuman Dingin", "Makanan"]);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let db = setup().await;
        let repo = db.categories();

        assert!(repo.get_by_id(99).await.unwrap().is_none());
        assert!(matches!(
            repo.update(99, &input("X", None)).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(repo.delete(99).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = setup().await;
        let err = db.categories().create(&input("   ", None)).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_referenced_category_fails() {
        let db = setup().await;
        let category = db.categories().create(&input("Snack", None)).await.unwrap();
        db.products()
            .create(&ProductInput {
                name: "Keripik".to_string(),
                price: Money::new(5_000),
                stock: 3,
                category_id: Some(category.id),
            })
            .await
            .unwrap();

        let err = db.categories().delete(category.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.categories().get_by_id(category.id).await.unwrap().is_some());
    }
}
