//! # Report Aggregation
//!
//! Builds [`SalesReport`]s from the grouped rows the database returns.
//!
//! The database does the heavy lifting (grouping by local calendar day and
//! by product); this module fills in the calendar, picks best sellers and
//! rolls days up into range totals.
//!
//! ## Data Flow
//! ```text
//! DailyRevenueRow { date, revenue, transactions }     (one per day with sales)
//! ProductSalesRow { date, product_id, name, qty }     (one per day × product)
//!          │
//!          ▼
//! build_report(range, ..)
//!          │
//!          ├── every day of range, oldest first, zero-filled
//!          ├── per-day top product
//!          └── range totals + range top product
//!          ▼
//! SalesReport
//! ```
//!
//! ## Best Seller Rule
//! Highest summed quantity wins; ties go to the lowest product id. The name
//! shown is the most recent snapshot name within the window, so a product
//! renamed mid-range appears under its latest name.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::{DailySales, DateRange, SalesReport, TopProduct};

// =============================================================================
// Input Rows
// =============================================================================

/// Revenue and transaction count for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRevenueRow {
    pub date: NaiveDate,
    pub revenue: Money,
    pub transactions: i64,
}

/// Quantity of one product sold on one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSalesRow {
    pub date: NaiveDate,
    pub product_id: i64,
    /// Snapshot name from the most recent detail row of that day.
    pub product_name: String,
    pub quantity: i64,
    /// Highest detail id of that day, used to find the latest name.
    pub last_detail_id: i64,
}

// =============================================================================
// Best Seller
// =============================================================================

#[derive(Debug, Default)]
struct ProductAccumulator {
    quantity: i64,
    name: String,
    last_detail_id: i64,
}

/// Sums quantities per product and picks the best seller.
#[derive(Debug, Default)]
struct BestSeller {
    // BTreeMap iterates in ascending product id, which settles ties
    products: BTreeMap<i64, ProductAccumulator>,
}

impl BestSeller {
    fn add(&mut self, row: &ProductSalesRow) {
        let acc = self.products.entry(row.product_id).or_default();
        acc.quantity += row.quantity;
        if row.last_detail_id >= acc.last_detail_id {
            acc.last_detail_id = row.last_detail_id;
            acc.name = row.product_name.clone();
        }
    }

    fn top(&self) -> Option<TopProduct> {
        let mut best: Option<(&i64, &ProductAccumulator)> = None;
        for (id, acc) in &self.products {
            if acc.quantity <= 0 {
                continue;
            }
            match best {
                Some((_, b)) if b.quantity >= acc.quantity => {}
                _ => best = Some((id, acc)),
            }
        }

        best.map(|(id, acc)| TopProduct {
            product_id: *id,
            name: acc.name.clone(),
            quantity_sold: acc.quantity,
        })
    }
}

// =============================================================================
// Report Builder
// =============================================================================

/// Assembles a range report.
///
/// Rows dated outside `range` are ignored. The breakdown always has exactly
/// `range.days()` entries.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use kasir_core::report::build_report;
/// use kasir_core::DateRange;
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// let range = DateRange { start_date: day, end_date: day };
///
/// let report = build_report(range, &[], &[]);
/// assert!(report.total_revenue.is_zero());
/// assert!(report.top_product.is_none());
/// assert_eq!(report.daily_breakdown.len(), 1);
/// ```
pub fn build_report(
    range: DateRange,
    days: &[DailyRevenueRow],
    products: &[ProductSalesRow],
) -> SalesReport {
    let in_range = |d: NaiveDate| d >= range.start_date && d <= range.end_date;

    let mut range_best = BestSeller::default();
    let mut daily_best: BTreeMap<NaiveDate, BestSeller> = BTreeMap::new();
    for row in products.iter().filter(|r| in_range(r.date)) {
        range_best.add(row);
        daily_best.entry(row.date).or_default().add(row);
    }

    let by_day: BTreeMap<NaiveDate, &DailyRevenueRow> = days
        .iter()
        .filter(|r| in_range(r.date))
        .map(|r| (r.date, r))
        .collect();

    let daily_breakdown: Vec<DailySales> = range
        .iter_days()
        .map(|date| {
            let (revenue, transactions) = by_day
                .get(&date)
                .map(|r| (r.revenue, r.transactions))
                .unwrap_or((Money::zero(), 0));
            DailySales {
                date,
                revenue,
                transactions,
                top_product: daily_best.get(&date).and_then(BestSeller::top),
            }
        })
        .collect();

    SalesReport {
        total_revenue: daily_breakdown.iter().map(|d| d.revenue).sum(),
        total_transactions: daily_breakdown.iter().map(|d| d.transactions).sum(),
        top_product: range_best.top(),
        date_range: range,
        daily_breakdown,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
