//! # kasir-api: HTTP Server for Kasir POS
//!
//! axum router over the `kasir-db` repositories.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer (span per request)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes::* handler ── parse id / JSON / query                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kasir-db repository ── DbError ──► ApiError ──► {"error": "..."}      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Json<T> with 200 / 201, or 204                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Layered server configuration
//! - [`error`] - `ApiError` and its status mapping
//! - [`routes`] - Handlers and the route table
//! - [`state`] - Shared handler state

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    routes::routes()
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
