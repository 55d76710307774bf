//! # Transaction Repository
//!
//! Atomic checkout and receipt lookup.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One SQLite Transaction                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │  1. INSERT transactions (total 0)   ← takes the write lock first       │
//! │  2. for each item, in request order:                                   │
//! │       SELECT product          → missing? ProductNotFound               │
//! │       CheckoutTally::add_line → short?   InsufficientStock             │
//! │  3. for each distinct product:                                         │
//! │       UPDATE stock = stock - qty WHERE stock >= qty                    │
//! │  4. UPDATE transactions SET total_amount                               │
//! │  5. INSERT transaction_details (name + price snapshot)                 │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error → ROLLBACK, nothing observable changed                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Because the header insert is the first statement, a checkout owns the
//! database write lock before it reads any stock. A second checkout blocks
//! in its own header insert (up to the busy timeout) and then reads the
//! stock the first one committed. The guarded decrement in step 3 is a
//! second line of defence; it never fires while the lock order holds.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use kasir_core::checkout::{CheckoutTally, StockSnapshot};
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, CoreError, Money, Transaction, TransactionDetail};

#[derive(Debug, sqlx::FromRow)]
struct StockRecord {
    id: i64,
    name: String,
    price: Money,
    stock: i64,
}

impl From<StockRecord> for StockSnapshot {
    fn from(r: StockRecord) -> Self {
        StockSnapshot {
            product_id: r.id,
            name: r.name,
            unit_price: r.price,
            stock: r.stock,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRecord {
    id: i64,
    total_amount: Money,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct DetailRecord {
    id: i64,
    transaction_id: i64,
    product_id: i64,
    product_name: String,
    unit_price: Money,
    quantity: i64,
    subtotal: Money,
}

impl From<DetailRecord> for TransactionDetail {
    fn from(r: DetailRecord) -> Self {
        TransactionDetail {
            id: r.id,
            transaction_id: r.transaction_id,
            product_id: r.product_id,
            product_name: r.product_name,
            unit_price: r.unit_price,
            quantity: r.quantity,
            subtotal: r.subtotal,
        }
    }
}

/// Repository for checkout and committed transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Sells the requested items as one atomic unit.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - Committed transaction with details in request order
    /// * `Err(DbError::Core(ProductNotFound | InsufficientStock | Validation))` - Rejected, nothing written
    /// * `Err(DbError::Busy)` - Write lock not acquired in time, safe to retry
    pub async fn checkout(&self, items: &[CheckoutItem]) -> DbResult<Transaction> {
        validate_checkout_items(items)?;

        debug!(lines = items.len(), "Starting checkout");

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        match apply_checkout(&mut *tx, items, now).await {
            Ok(transaction) => {
                tx.commit().await?;
                info!(
                    transaction_id = transaction.id,
                    total = %transaction.total_amount,
                    lines = transaction.details.len(),
                    "Checkout committed"
                );
                Ok(transaction)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Checkout rollback failed");
                }
                debug!(error = %err, "Checkout rolled back");
                Err(err)
            }
        }
    }

    /// Reads a committed transaction with its details.
    ///
    /// ## Returns
    /// * `Ok(None)` - No transaction with that id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header: Option<TransactionRecord> = sqlx::query_as(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let details: Vec<DetailRecord> = sqlx::query_as(
            r#"
            SELECT id, transaction_id, product_id, product_name, unit_price, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Transaction {
            id: header.id,
            total_amount: header.total_amount,
            created_at: header.created_at,
            details: details.into_iter().map(TransactionDetail::from).collect(),
        }))
    }
}

/// Runs every checkout statement on the open transaction's connection.
///
/// The caller commits on `Ok` and rolls back on `Err`.
async fn apply_checkout(
    conn: &mut SqliteConnection,
    items: &[CheckoutItem],
    now: DateTime<Utc>,
) -> DbResult<Transaction> {
    let transaction_id =
        sqlx::query("INSERT INTO transactions (total_amount, created_at) VALUES (0, ?1)")
            .bind(now)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

    let mut tally = CheckoutTally::new();
    for item in items {
        let record: Option<StockRecord> =
            sqlx::query_as("SELECT id, name, price, stock FROM products WHERE id = ?1")
                .bind(item.product_id)
                .fetch_optional(&mut *conn)
                .await?;

        let record = record.ok_or(CoreError::ProductNotFound(item.product_id))?;
        tally.add_line(&StockSnapshot::from(record), item.quantity)?;
    }

    for &(product_id, quantity) in tally.stock_decrements() {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = stock - ?1,
                updated_at = ?2
            WHERE id = ?3 AND stock >= ?1
            "#,
        )
        .bind(quantity)
        .bind(now)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::TransactionFailed(format!(
                "stock of product {product_id} changed during checkout"
            )));
        }
    }

    let total_amount = tally.total();
    sqlx::query("UPDATE transactions SET total_amount = ?1 WHERE id = ?2")
        .bind(total_amount)
        .bind(transaction_id)
        .execute(&mut *conn)
        .await?;

    let (lines, _) = tally.into_parts();
    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        let detail_id = sqlx::query(
            r#"
            INSERT INTO transaction_details (
                transaction_id, product_id, product_name, unit_price, quantity, subtotal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(transaction_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.unit_price)
        .bind(line.quantity)
        .bind(line.subtotal)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

        details.push(TransactionDetail {
            id: detail_id,
            transaction_id,
            product_id: line.product_id,
            product_name: line.product_name,
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.subtotal,
        });
    }

    Ok(Transaction {
        id: transaction_id,
        total_amount,
        created_at: now,
        details,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kasir_core::{Product, ProductInput};
    use std::path::PathBuf;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn product(db: &Database, name: &str, price: i64, stock: i64) -> Product {
        db.products()
            .create(&ProductInput {
                name: name.to_string(),
                price: Money::new(price),
                stock,
                category_id: None,
            })
            .await
            .unwrap()
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    async fn transaction_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    fn item(product_id: i64, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_checkout_then_insufficient_stock() {
        let db = setup().await;
        let a = product(&db, "A", 10, 5).await;
        let b = product(&db, "B", 20, 2).await;
        let repo = db.transactions();

        let tx = repo.checkout(&[item(a.id, 2), item(b.id, 1)]).await.unwrap();
        assert_eq!(tx.total_amount, Money::new(40));
        assert_eq!(tx.total_amount, tx.details_total());
        assert_eq!(tx.details.len(), 2);
        assert_eq!(tx.details[0].product_name, "A");
        assert_eq!(tx.details[0].subtotal, Money::new(20));
        assert_eq!(tx.details[1].unit_price, Money::new(20));
        assert_eq!(stock_of(&db, a.id).await, 3);
        assert_eq!(stock_of(&db, b.id).await, 1);

        let err = repo.checkout(&[item(b.id, 3)]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock {
                product_id,
                requested: 3,
                available: 1,
                ..
            }) if product_id == b.id
        ));
        assert_eq!(stock_of(&db, b.id).await, 1);
        assert_eq!(transaction_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_failure_on_later_line_leaves_no_trace() {
        let db = setup().await;
        let a = product(&db, "A", 10, 5).await;
        let b = product(&db, "B", 20, 0).await;

        let err = db
            .transactions()
            .checkout(&[item(a.id, 2), item(b.id, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InsufficientStock { .. })));

        assert_eq!(stock_of(&db, a.id).await, 5);
        assert_eq!(transaction_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let db = setup().await;
        let a = product(&db, "A", 10, 5).await;

        let err = db
            .transactions()
            .checkout(&[item(a.id, 1), item(999, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ProductNotFound(999))));
        assert_eq!(stock_of(&db, a.id).await, 5);
        assert_eq!(transaction_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_reading() {
        let db = setup().await;
        let repo = db.transactions();

        for items in [vec![], vec![item(1, 0)], vec![item(1, 1000)]] {
            let err = repo.checkout(&items).await.unwrap_err();
            assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        }
        assert_eq!(transaction_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_lines_draw_down_same_stock() {
        let db = setup().await;
        let a = product(&db, "A", 10, 5).await;
        let repo = db.transactions();

        let tx = repo.checkout(&[item(a.id, 2), item(a.id, 3)]).await.unwrap();
        assert_eq!(tx.details.len(), 2);
        assert_eq!(tx.total_amount, Money::new(50));
        assert_eq!(stock_of(&db, a.id).await, 0);

        let err = repo.checkout(&[item(a.id, 1)]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock { available: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_snapshot_survives_product_changes() {
        let db = setup().await;
        let a = product(&db, "Es Teh", 5_000, 10).await;
        let tx = db.transactions().checkout(&[item(a.id, 2)]).await.unwrap();

        db.products()
            .update(
                a.id,
                &ProductInput {
                    name: "Es Teh Jumbo".to_string(),
                    price: Money::new(8_000),
                    stock: 8,
                    category_id: None,
                },
            )
            .await
            .unwrap();
        db.products().delete(a.id).await.unwrap();

        let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(stored.details, tx.details);
        assert_eq!(stored.details[0].product_name, "Es Teh");
        assert_eq!(stored.details[0].unit_price, Money::new(5_000));
        assert_eq!(stored.total_amount, Money::new(10_000));
    }

    #[tokio::test]
    async fn test_get_unknown_transaction() {
        let db = setup().await;
        assert!(db.transactions().get_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let path: PathBuf =
            std::env::temp_dir().join(format!("kasir-checkout-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();
        let a = product(&db, "A", 10, 5).await;

        let mut handles = Vec::new();
        for _ in 0..12 {
            let repo = db.transactions();
            let id = a.id;
            handles.push(tokio::spawn(async move { repo.checkout(&[item(id, 1)]).await }));
        }

        let mut committed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => committed += 1,
                Err(DbError::Core(CoreError::InsufficientStock { .. })) => rejected += 1,
                Err(other) => panic!("unexpected checkout error: {other}"),
            }
        }

        assert_eq!(committed, 5);
        assert_eq!(rejected, 7);
        assert_eq!(stock_of(&db, a.id).await, 0);
        assert_eq!(transaction_count(&db).await, 5);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
