//! # Transaction Routes
//!
//! Read-back of committed checkouts.

use axum::extract::{Path, State};
use axum::Json;
use kasir_core::Transaction;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /api/transaction/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Transaction>> {
    let id = parse_id(&id)?;
    let transaction = state
        .db()
        .transactions()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", id))?;

    Ok(Json(transaction))
}
