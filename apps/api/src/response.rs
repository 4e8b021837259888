//! Uniform response envelope.
//!
//! Every endpoint, success or failure, answers with
//! `{"success": bool, "data"?: ..., "error"?: string}`.

use axum::Json;
use serde::Serialize;

use crate::error::ApiError;

/// The response envelope shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a payload in a successful envelope.
    pub fn ok(data: T) -> Json<Self> {
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

impl ApiResponse<()> {
    /// Builds a failure envelope with a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler result: successful envelope or an [`ApiError`] that renders
/// into a failure envelope.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
