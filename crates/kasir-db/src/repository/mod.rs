//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.db().transactions().checkout(&items)                      │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── checkout(&self, items)      (one SQLite transaction)              │
//! │  └── get_by_id(&self, id)                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories own a cloned `SqlitePool` and are created per use through
//! [`Database`](crate::Database). Each reads rows into a private
//! `sqlx::FromRow` record and converts it into the kasir-core type.
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and name filter
//! - [`TransactionRepository`](transaction::TransactionRepository) - Atomic checkout and receipts
//! - [`ReportRepository`](report::ReportRepository) - Sales summaries and breakdowns

pub mod category;
pub mod product;
pub mod report;
pub mod transaction;
