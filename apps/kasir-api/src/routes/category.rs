//! # Category Routes
//!
//! CRUD over `/api/category`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{Category, CategoryInput};
use tracing::debug;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /api/category`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db().categories().list().await?;
    Ok(Json(categories))
}

/// `POST /api/category`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    debug!(name = %input.name, "create_category");

    let category = state.db().categories().create(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /api/category/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id)?;
    let category = state
        .db()
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))?;

    Ok(Json(category))
}

/// `PUT /api/category/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;

    let category = state.db().categories().update(id, &input).await?;
    Ok(Json(category))
}

/// `DELETE /api/category/{id}`
///
/// Fails with 400 while products still reference the category.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.db().categories().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, send, send_raw};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_category_lifecycle() {
        let (app, _db) = app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/category",
            Some(json!({"name": "Minuman", "description": "Dingin & panas"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["name"], "Minuman");

        let (status, list) = send(&app, Method::GET, "/api/category", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let uri = format!("/api/category/{id}");
        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({"name": "Minuman Segar"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Minuman Segar");
        assert!(updated["description"].is_null());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], format!("Category not found: {id}"));
    }

    #[tokio::test]
    async fn test_bad_input() {
        let (app, _db) = app().await;

        let (status, body) = send(&app, Method::GET, "/api/category/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid ID");

        let (status, body) = send_raw(&app, Method::POST, "/api/category", "{\"name\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

        let (status, body) =
            send(&app, Method::POST, "/api/category", Some(json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/category/99",
            Some(json!({"name": "Ghost"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_category_in_use() {
        let (app, _db) = app().await;

        let (_, category) =
            send(&app, Method::POST, "/api/category", Some(json!({"name": "Makanan"}))).await;
        let category_id = category["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/product",
            Some(json!({"name": "Nasi Goreng", "price": 22000, "stock": 5, "category_id": category_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/category/{category_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid reference"));
    }
}
