//! # Health Route

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// `GET /health`
///
/// 200 while the database answers `SELECT 1`, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthStatus>> {
    if state.db().health_check().await {
        Ok(Json(HealthStatus { status: "ok" }))
    } else {
        tracing::warn!("Health check failed: database unreachable");
        Err(ApiError::unavailable("Database unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, send};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health() {
        let (app, db) = app().await;

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        db.close().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Database unavailable");
    }
}
