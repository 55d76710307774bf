//! # HTTP Routes
//!
//! Route table and shared handler helpers.
//!
//! ## Endpoint Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                        health::health                  │
//! │                                                                         │
//! │  GET    /api/category                  category::list                  │
//! │  POST   /api/category                  category::create       → 201    │
//! │  GET    /api/category/{id}             category::get                   │
//! │  PUT    /api/category/{id}             category::update                │
//! │  DELETE /api/category/{id}             category::delete       → 204    │
//! │                                                                         │
//! │  GET    /api/product?name=             product::list                   │
//! │  POST   /api/product                   product::create        → 201    │
//! │  GET    /api/product/{id}              product::get                    │
//! │  PUT    /api/product/{id}              product::update                 │
//! │  DELETE /api/product/{id}              product::delete        → 204    │
//! │                                                                         │
//! │  POST   /api/checkout                  checkout::checkout     → 201    │
//! │  GET    /api/transaction/{id}          transaction::get                │
//! │                                                                         │
//! │  GET    /api/report/hari-ini           report::today                   │
//! │  GET    /api/report?start_date=&end_date=   report::range              │
//! │                                                                         │
//! │  Any other method on a known path → 405 {"error": ...}                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod checkout;
pub mod health;
pub mod product;
pub mod report;
pub mod transaction;

use axum::routing::{get, post};
use axum::Router;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Builds every route. State is attached by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health).fallback(method_not_allowed))
        .route(
            "/api/category",
            get(category::list)
                .post(category::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/category/{id}",
            get(category::get)
                .put(category::update)
                .delete(category::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/product",
            get(product::list)
                .post(product::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/product/{id}",
            get(product::get)
                .put(product::update)
                .delete(product::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/checkout",
            post(checkout::checkout).fallback(method_not_allowed),
        )
        .route(
            "/api/transaction/{id}",
            get(transaction::get).fallback(method_not_allowed),
        )
        .route(
            "/api/report/hari-ini",
            get(report::today).fallback(method_not_allowed),
        )
        .route("/api/report", get(report::range).fallback(method_not_allowed))
}

/// Parses a path id. Non-numeric, zero and negative ids are rejected.
pub(crate) fn parse_id(raw: &str) -> ApiResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request("Invalid ID")),
    }
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Unknown path.
pub(crate) async fn not_found() -> ApiError {
    ApiError::new(axum::http::StatusCode::NOT_FOUND, "Not found")
}
