//! # Report Routes
//!
//! Sales summaries. Day boundaries follow the configured report offset.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use kasir_core::{SalesReport, SalesSummary};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Query string of `GET /api/report`.
///
/// Both fields are optional here so a missing one is reported as a date
/// range error instead of a generic query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /api/report/hari-ini`
pub async fn today(State(state): State<AppState>) -> ApiResult<Json<SalesSummary>> {
    let summary = state.db().reports().today_summary().await?;
    Ok(Json(summary))
}

/// `GET /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
pub async fn range(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<SalesReport>> {
    let Query(query) = query?;
    let start = query.start_date.as_deref().unwrap_or_default();
    let end = query.end_date.as_deref().unwrap_or_default();
    debug!(start = %start, end = %end, "range_report");

    let report = state.db().reports().range_report_from_str(start, end).await?;
    Ok(Json(report))
}
