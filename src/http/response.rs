//! JSON status bodies shared by the API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::playback::types::unix_now;

/// Status envelope for token and error responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Unix seconds.
    pub timestamp: u64,
}

impl ApiResponse {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(code.to_string()),
            message: Some(message.into()),
            timestamp: unix_now(),
            ..Self::default()
        }
    }

    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            timestamp: unix_now(),
            ..Self::default()
        }
    }
}

/// Error body with the given status code.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(code, message))).into_response()
}
