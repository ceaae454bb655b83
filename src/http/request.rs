//! Request identification.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (UUID v4)
//! - An incoming `x-request-id` is kept and echoed back

use axum::http::HeaderMap;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID header value, or "unknown".
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
