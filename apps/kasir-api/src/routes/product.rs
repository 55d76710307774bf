//! # Product Routes
//!
//! CRUD over `/api/product`, plus a name filter on the list.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{Product, ProductInput};
use serde::Deserialize;
use tracing::debug;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
}

/// `GET /api/product[?name=]`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let products = state.db().products().list(query.name.as_deref()).await?;
    Ok(Json(products))
}

/// `POST /api/product`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    debug!(name = %input.name, "create_product");

    let product = state.db().products().create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/product/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&id)?;
    let product = state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(Json(product))
}

/// `PUT /api/product/{id}`
///
/// Replaces every field, stock included.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;

    let product = state.db().products().update(id, &input).await?;
    Ok(Json(product))
}

/// `DELETE /api/product/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.db().products().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
