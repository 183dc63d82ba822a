//! Error types for the guarded API
//!
//! The cache has no error of its own. Rate limiting and backend failures are
//! kept distinct so clients can back off on one and not the other.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ErrorResponse;

// == Rate Limit Exceeded ==
/// A client spent its budget for the current window.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Rate limit of {limit} requests exceeded, retry in {}s", whole_secs(.retry_after))]
pub struct RateLimitExceeded {
    /// Limit that was hit
    pub limit: u32,
    /// Time until the client's window resets
    pub retry_after: Duration,
}

impl RateLimitExceeded {
    /// Whole seconds to advertise in `Retry-After`, never below 1.
    pub fn retry_after_secs(&self) -> u64 {
        whole_secs(&self.retry_after)
    }
}

fn whole_secs(retry_after: &Duration) -> u64 {
    let secs = retry_after
        .as_secs()
        .saturating_add(u64::from(retry_after.subsec_nanos() > 0));
    secs.max(1)
}

// == Backend Error ==
/// Failures of the backup backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend could not be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Backend command ran and failed
    #[error("Backend command failed: {0}")]
    CommandFailed(String),
}

// == API Error Enum ==
/// Unified error type for route handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RateLimited(err) => return rate_limited_response(err),
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// 429 with a `Retry-After` header so clients can back off.
fn rate_limited_response(err: &RateLimitExceeded) -> Response {
    let secs = err.retry_after_secs();
    let body = Json(json!({
        "error": err.to_string(),
        "retry_after_secs": secs,
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    response
}

// == Result Type Alias ==
/// Convenience Result type for route handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
