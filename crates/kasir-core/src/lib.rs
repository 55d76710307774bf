//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains the business rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP clients (cashier UI)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-api (axum routes)                      │   │
//! │  │    /api/category, /api/product, /api/checkout, /api/report     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │  report   │  │   │
//! │  │   │  Product  │  │   Money   │  │  Tally    │  │  Summary  │  │   │
//! │  │   │Transaction│  │           │  │  Lines    │  │ Breakdown │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, atomic checkout            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Transaction, reports)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`checkout`] - Ordered fold that turns checkout items into priced lines
//! - [`report`] - Aggregation of sales rows into summaries and breakdowns
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::checkout::{CheckoutTally, StockSnapshot};
//! use kasir_core::Money;
//!
//! let coffee = StockSnapshot {
//!     product_id: 1,
//!     name: "Kopi Susu".to_string(),
//!     unit_price: Money::new(18_000),
//!     stock: 5,
//! };
//!
//! let mut tally = CheckoutTally::new();
//! tally.add_line(&coffee, 2).unwrap();
//!
//! assert_eq!(tally.total(), Money::new(36_000));
//! ```

pub mod checkout;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kasir_core::Money` instead of
// `use kasir_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single checkout request.
///
/// ## Business Reason
/// Prevents runaway requests and keeps the checkout transaction short,
/// since it holds the database write lock while it runs.
pub const MAX_CHECKOUT_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Longest date range (inclusive, in days) a sales report may cover.
pub const MAX_REPORT_RANGE_DAYS: i64 = 366;
