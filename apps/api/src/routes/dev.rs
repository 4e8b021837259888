//! Development-only endpoints.

use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;
use tracing::warn;

use crate::response::{ApiResponse, ApiResult};
use crate::{seed_sample_data, AppState};

#[derive(Serialize)]
pub struct ResetResult {
    pub message: &'static str,
}

/// `POST /api/reset-db`
///
/// Drops every table, re-runs migrations and reseeds the sample data.
/// Destructive and unauthenticated, for local development only.
pub async fn reset_db(State(state): State<Arc<AppState>>) -> ApiResult<ResetResult> {
    warn!("Resetting database");

    bazaar_db::migrations::reset_database(state.db.pool()).await?;
    seed_sample_data(&state.db).await?;

    Ok(ApiResponse::ok(ResetResult {
        message: "Database reset successfully",
    }))
}
