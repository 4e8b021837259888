//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// `GET /api/health`
///
/// Verifies the database answers a trivial query.
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthStatus> {
    if !state.db.health_check().await {
        return Err(ApiError::Internal("database health check failed".to_string()));
    }

    Ok(ApiResponse::ok(HealthStatus { status: "ok" }))
}
