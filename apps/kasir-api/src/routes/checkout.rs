//! # Checkout Route
//!
//! ## Checkout Flow
//! ```text
//! POST /api/checkout {"items": [{"product_id": 1, "quantity": 2}, ...]}
//!      │
//!      ▼
//! TransactionRepository::checkout  (one SQLite transaction)
//!      │
//!      ├── every line priced and stock decremented ──► 201 Transaction
//!      ├── unknown product ──────────────────────────► 404, nothing written
//!      ├── stock too low / bad quantity ─────────────► 400, nothing written
//!      └── write lock not acquired in time ──────────► 503, safe to retry
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{CheckoutRequest, Transaction};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /api/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(request) = payload?;
    debug!(lines = request.items.len(), "checkout");

    let transaction = state.db().transactions().checkout(&request.items).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, send, send_raw};
    use axum::http::{Method, StatusCode};
    use kasir_core::{Money, ProductInput};
    use kasir_db::Database;
    use serde_json::json;

    async fn product(db: &Database, name: &str, price: i64, stock: i64) -> i64 {
        db.products()
            .create(&ProductInput {
                name: name.to_string(),
                price: Money::new(price),
                stock,
                category_id: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_checkout_then_insufficient_stock() {
        let (app, db) = app().await;
        let a = product(&db, "A", 10, 5).await;
        let b = product(&db, "B", 20, 2).await;

        let (status, tx) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [
                {"product_id": a, "quantity": 2},
                {"product_id": b, "quantity": 1},
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tx["total_amount"], 40);
        assert_eq!(tx["details"].as_array().unwrap().len(), 2);
        assert_eq!(tx["details"][0]["subtotal"], 20);
        assert_eq!(tx["details"][1]["product_name"], "B");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [{"product_id": b, "quantity": 3}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("requested 3, available 1"));

        let stock_a = db.products().get_by_id(a).await.unwrap().unwrap().stock;
        let stock_b = db.products().get_by_id(b).await.unwrap().unwrap().stock;
        assert_eq!((stock_a, stock_b), (3, 1));
    }

    #[tokio::test]
    async fn test_unknown_product_is_404() {
        let (app, db) = app().await;
        let a = product(&db, "A", 10, 5).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [
                {"product_id": a, "quantity": 1},
                {"product_id": 999, "quantity": 1},
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found: 999");
        assert_eq!(db.products().get_by_id(a).await.unwrap().unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_rejects_bad_requests() {
        let (app, db) = app().await;
        let a = product(&db, "A", 10, 5).await;

        let (status, _) =
            send(&app, Method::POST, "/api/checkout", Some(json!({"items": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/checkout",
            Some(json!({"items": [{"product_id": a, "quantity": 0}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send_raw(&app, Method::POST, "/api/checkout", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        assert_eq!(db.products().get_by_id(a).await.unwrap().unwrap().stock, 5);
    }
}
