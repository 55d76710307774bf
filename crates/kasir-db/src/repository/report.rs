//! # Report Repository
//!
//! Read-only sales reporting over committed transactions.
//!
//! ## Calendar Days
//! Transactions are stored with UTC timestamps. Reports group them by the
//! business calendar day, which is the UTC time shifted by the configured
//! offset. SQLite does the shift with a `date(created_at, '+420 minutes')`
//! modifier, so a sale at 2026-03-01T20:00Z counts on 2026-03-02 at +07:00.
//!
//! ## Queries
//! ```text
//! daily revenue:   day │ SUM(total_amount) │ COUNT(*)         GROUP BY day
//! product sales:   day │ product_id │ name │ SUM(quantity)    GROUP BY day, product
//!                                   ▲
//!                 name comes from the row holding MAX(detail id)
//!          │
//!          ▼
//! kasir_core::report::build_report → zero-filled SalesReport
//! ```

use chrono::{FixedOffset, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::report::{build_report, DailyRevenueRow, ProductSalesRow};
use kasir_core::validation::{parse_date_range, validate_date_range};
use kasir_core::{DateRange, Money, SalesReport, SalesSummary};

#[derive(Debug, sqlx::FromRow)]
struct DailyRevenueRecord {
    day: String,
    revenue: Money,
    transactions: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductSalesRecord {
    day: String,
    product_id: i64,
    product_name: String,
    quantity: i64,
    last_detail_id: i64,
}

fn parse_day(day: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DbError::Internal(format!("unexpected report day '{day}': {e}")))
}

impl TryFrom<DailyRevenueRecord> for DailyRevenueRow {
    type Error = DbError;

    fn try_from(r: DailyRevenueRecord) -> DbResult<Self> {
        Ok(DailyRevenueRow {
            date: parse_day(&r.day)?,
            revenue: r.revenue,
            transactions: r.transactions,
        })
    }
}

impl TryFrom<ProductSalesRecord> for ProductSalesRow {
    type Error = DbError;

    fn try_from(r: ProductSalesRecord) -> DbResult<Self> {
        Ok(ProductSalesRow {
            date: parse_day(&r.day)?,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            last_detail_id: r.last_detail_id,
        })
    }
}

/// SQLite date modifier that shifts UTC into the business offset.
fn day_modifier(offset: FixedOffset) -> String {
    format!("{:+} minutes", offset.local_minus_utc() / 60)
}

/// Repository for sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    offset: FixedOffset,
}

impl ReportRepository {
    /// Creates a new ReportRepository for the given business offset.
    pub fn new(pool: SqlitePool, offset: FixedOffset) -> Self {
        ReportRepository { pool, offset }
    }

    /// Today's date in the business offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Revenue, transaction count and best seller for today.
    pub async fn today_summary(&self) -> DbResult<SalesSummary> {
        let today = self.today();
        let report = self.range_report(today, today).await?;
        Ok(report.summary())
    }

    /// Report for an inclusive date range with a zero-filled daily breakdown.
    ///
    /// ## Returns
    /// * `Err(DbError::Core(InvalidDateRange))` - start after end, or range too long
    pub async fn range_report(&self, start: NaiveDate, end: NaiveDate) -> DbResult<SalesReport> {
        let range: DateRange = validate_date_range(start, end)?;
        let modifier = day_modifier(self.offset);
        let start = range.start_date.to_string();
        let end = range.end_date.to_string();

        debug!(start = %start, end = %end, modifier = %modifier, "Building sales report");

        let days: Vec<DailyRevenueRecord> = sqlx::query_as(
            r#"
            SELECT
                date(created_at, ?1) AS day,
                SUM(total_amount) AS revenue,
                COUNT(*) AS transactions
            FROM transactions
            WHERE date(created_at, ?1) BETWEEN ?2 AND ?3
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(&modifier)
        .bind(&start)
        .bind(&end)
        .fetch_all(&self.pool)
        .await?;

        // SQLite fills bare columns (product_name) from the row that holds
        // the MAX() value, so each group reports its latest snapshot name.
        let products: Vec<ProductSalesRecord> = sqlx::query_as(
            r#"
            SELECT
                date(t.created_at, ?1) AS day,
                d.product_id AS product_id,
                d.product_name AS product_name,
                SUM(d.quantity) AS quantity,
                MAX(d.id) AS last_detail_id
            FROM transaction_details d
            JOIN transactions t ON t.id = d.transaction_id
            WHERE date(t.created_at, ?1) BETWEEN ?2 AND ?3
            GROUP BY day, d.product_id
            ORDER BY day, d.product_id
            "#,
        )
        .bind(&modifier)
        .bind(&start)
        .bind(&end)
        .fetch_all(&self.pool)
        .await?;

        let days = days
            .into_iter()
            .map(DailyRevenueRow::try_from)
            .collect::<DbResult<Vec<_>>>()?;
        let products = products
            .into_iter()
            .map(ProductSalesRow::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        let report = build_report(range, &days, &products);
        debug!(
            revenue = %report.total_revenue,
            transactions = report.total_transactions,
            "Sales report built"
        );
        Ok(report)
    }

    /// Parses `YYYY-MM-DD` bounds and builds the range report.
    pub async fn range_report_from_str(&self, start: &str, end: &str) -> DbResult<SalesReport> {
        let range = parse_date_range(start, end)?;
        self.range_report(range.start_date, range.end_date).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
