//! # Application State
//!
//! Shared state handed to every axum handler.
//!
//! ## Thread Safety
//! The `Database` from `kasir-db` wraps a `SqlitePool`, which is
//! reference counted and thread-safe. Cloning the state per request clones
//! the pool handle, not the connections.

use kasir_db::Database;

/// State injected with `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    /// Creates a new AppState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn db(&self) -> &Database {
        &self.db
    }
}
