//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations, reads joined with their category
//! - Case-insensitive name filter
//!
//! ## Stock Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Writes products.stock                            │
//! │                                                                         │
//! │  PUT /api/product/{id}   ──► update()   absolute value (correction)    │
//! │  POST /api/checkout      ──► TransactionRepository::checkout()         │
//! │                              guarded delta: stock = stock - qty        │
//! │                                           WHERE stock >= qty           │
//! │                                                                         │
//! │  The CHECK (stock >= 0) constraint backs both paths.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::validation::{validate_name, validate_price, validate_stock};
use kasir_core::{Category, Money, Product, ProductInput};

/// Shared SELECT for product reads. Callers append WHERE / ORDER BY.
const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.price,
        p.stock,
        p.category_id,
        c.name AS category_name,
        c.description AS category_description
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct ProductRecord {
    id: i64,
    name: String,
    price: Money,
    stock: i64,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_description: Option<String>,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        let category = match (r.category_id, r.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id,
                name,
                description: r.category_description,
            }),
            _ => None,
        };

        Product {
            id: r.id,
            name: r.name,
            price: r.price,
            stock: r.stock,
            category_id: r.category_id,
            category,
        }
    }
}

/// Validated, trimmed form of a [`ProductInput`].
struct ProductFields {
    name: String,
    price: Money,
    stock: i64,
    category_id: Option<i64>,
}

impl ProductFields {
    fn parse(input: &ProductInput) -> DbResult<Self> {
        let name = validate_name("name", &input.name)?;
        validate_price(input.price)?;
        validate_stock(input.stock)?;

        Ok(ProductFields {
            name,
            price: input.price,
            stock: input.stock,
            category_id: input.category_id,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Filter by name
/// let results = repo.list(Some("kopi")).await?;
///
/// // Get by ID
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by id.
    ///
    /// ## Arguments
    /// * `name` - Optional case-insensitive substring filter; blank means no filter
    pub async fn list(&self, name: Option<&str>) -> DbResult<Vec<Product>> {
        let filter = name.map(str::trim).filter(|n| !n.is_empty());

        debug!(filter = ?filter, "Listing products");

        // instr() instead of LIKE so '%' and '_' in the filter match literally
        let sql = format!(
            "{PRODUCT_SELECT} WHERE ?1 IS NULL OR instr(lower(p.name), lower(?1)) > 0 ORDER BY p.id"
        );
        let records: Vec<ProductRecord> = sqlx::query_as(&sql)
            .bind(filter)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Listed products");
        Ok(records.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID, with its category joined.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?1");
        let record: Option<ProductRecord> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Product::from))
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its id and category
    /// * `Err(DbError::ForeignKeyViolation)` - category_id doesn't exist
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        let fields = ProductFields::parse(input)?;
        let now = Utc::now();

        debug!(name = %fields.name, price = %fields.price, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price, stock, category_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&fields.name)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(fields.category_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("product {id} missing after insert")))
    }

    /// Replaces every field of an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        let fields = ProductFields::parse(input)?;

        debug!(id = %id, name = %fields.name, stock = fields.stock, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price = ?3,
                stock = ?4,
                category_id = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(fields.category_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Past transaction details keep their snapshot.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
