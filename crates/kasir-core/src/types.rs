//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │◄──│    Product      │   │    Transaction      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  id                 │   │
//! │  │  name           │   │  name, price    │   │  total_amount       │   │
//! │  │  description    │   │  stock          │   │  created_at         │   │
//! │  └─────────────────┘   │  category_id    │   │  details ───────┐   │   │
//! │                        └─────────────────┘   └─────────────────┼───┘   │
//! │                                                                 ▼       │
//! │                                              ┌─────────────────────┐   │
//! │                                              │ TransactionDetail   │   │
//! │                                              │  product_name (snap)│   │
//! │                                              │  unit_price (snap)  │   │
//! │                                              │  quantity, subtotal │   │
//! │                                              └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Report types keep the field names existing cashier clients already read
//! (`total_transaksi`, `produk_terlaris`, `nama`, `qty_terjual`), while the
//! Rust side uses English names.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name shown to the cashier and snapshotted onto receipts.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    /// Units on hand. Never negative after a committed operation.
    pub stock: i64,

    pub category_id: Option<i64>,

    /// The referenced category, joined on reads.
    pub category: Option<Category>,
}

/// Payload for creating or replacing a product.
///
/// `stock` here is an administrative correction; sales only ever decrement
/// stock through checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// Checkout request body. Consumed and turned into a [`Transaction`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: i64,

    /// Sum of every detail's subtotal.
    pub total_amount: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Line items in request order.
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Recomputes the total from the details.
    pub fn details_total(&self) -> Money {
        self.details.iter().map(|d| d.subtotal).sum()
    }
}

/// A line item in a transaction.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    pub quantity: i64,
    /// `unit_price × quantity`.
    pub subtotal: Money,
}

// =============================================================================
// Reports
// =============================================================================

/// Best-selling product within a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub product_id: i64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "qty_terjual")]
    pub quantity_sold: i64,
}

/// Revenue, transaction count and best seller for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_revenue: Money,
    #[serde(rename = "total_transaksi")]
    pub total_transactions: i64,
    /// `None` when nothing sold in the window.
    #[serde(rename = "produk_terlaris")]
    pub top_product: Option<TopProduct>,
}

impl SalesSummary {
    /// A summary for a window with no sales.
    pub fn empty() -> Self {
        SalesSummary {
            total_revenue: Money::zero(),
            total_transactions: 0,
            top_product: None,
        }
    }
}

/// Inclusive calendar-date range of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Iterates every day of the range in ascending order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }
}

/// One day of a range report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue: Money,
    #[serde(rename = "transaksi")]
    pub transactions: i64,
    pub top_product: Option<TopProduct>,
}

/// Range report: totals over the whole range plus a per-day breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub total_revenue: Money,
    #[serde(rename = "total_transaksi")]
    pub total_transactions: i64,
    #[serde(rename = "produk_terlaris")]
    pub top_product: Option<TopProduct>,
    pub date_range: DateRange,
    /// One entry per day of `date_range`, zero-filled, oldest first.
    pub daily_breakdown: Vec<DailySales>,
}

impl SalesReport {
    /// The range-wide totals without the breakdown.
    pub fn summary(&self) -> SalesSummary {
        SalesSummary {
            total_revenue: self.total_revenue,
            total_transactions: self.total_transactions,
            top_product: self.top_product.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_date_range_days() {
        let range = DateRange {
            start_date: date("2026-02-27"),
            end_date: date("2026-03-02"),
        };
        assert_eq!(range.days(), 4);

        let days: Vec<NaiveDate> = range.iter_days().collect();
        assert_eq!(
            days,
            vec![
                date("2026-02-27"),
                date("2026-02-28"),
                date("2026-03-01"),
                date("2026-03-02"),
            ]
        );
    }

    #[test]
    fn test_single_day_range() {
        let d = date("2026-10-18");
        let range = DateRange {
            start_date: d,
            end_date: d,
        };
        assert_eq!(range.days(), 1);
        assert_eq!(range.iter_days().count(), 1);
    }

    #[test]
    fn test_summary_wire_names() {
        let summary = SalesSummary {
            total_revenue: Money::new(40),
            total_transactions: 1,
            top_product: Some(TopProduct {
                product_id: 1,
                name: "A".to_string(),
                quantity_sold: 2,
            }),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_revenue"], 40);
        assert_eq!(json["total_transaksi"], 1);
        assert_eq!(json["produk_terlaris"]["nama"], "A");
        assert_eq!(json["produk_terlaris"]["qty_terjual"], 2);

        let json = serde_json::to_value(SalesSummary::empty()).unwrap();
        assert!(json["produk_terlaris"].is_null());
    }

    #[test]
    fn test_details_total() {
        let detail = |id, subtotal| TransactionDetail {
            id,
            transaction_id: 1,
            product_id: id,
            product_name: format!("P{id}"),
            unit_price: Money::new(subtotal),
            quantity: 1,
            subtotal: Money::new(subtotal),
        };
        let tx = Transaction {
            id: 1,
            total_amount: Money::new(30),
            created_at: Utc::now(),
            details: vec![detail(1, 10), detail(2, 20)],
        };
        assert_eq!(tx.details_total(), tx.total_amount);
    }
}
