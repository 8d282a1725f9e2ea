// src/error.rs
// Error taxonomy and HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::AVAILABLE_ROUTES;

/// Failures raised by a `ConfigStore`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("missing locationId")]
    MissingLocationId,

    #[error("missing token")]
    MissingToken,

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(format!("corrupt record: {}", err))
    }
}

/// Failures talking to GoHighLevel or Papi.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not configured: {0}")]
    NotConfigured(String),
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("config store: {0}")]
    Store(#[from] StoreError),

    #[error("http client: {0}")]
    Client(#[from] ClientError),
}

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("route not found")]
    NotFound { path: String, method: String },

    #[error("method not allowed")]
    MethodNotAllowed { path: String, method: String },

    #[error("no configuration for location {0}")]
    MissingConfig(String),

    #[error("upstream service failed: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingLocationId | StoreError::MissingToken => {
                AppError::Validation(err.to_string())
            }
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            AppError::NotFound { path, method } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "route not found",
                    "path": path,
                    "method": method,
                    "availableRoutes": AVAILABLE_ROUTES,
                })),
            )
                .into_response(),
            AppError::MethodNotAllowed { path, method } => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({
                    "error": "method not allowed",
                    "path": path,
                    "method": method,
                })),
            )
                .into_response(),
            AppError::MissingConfig(location_id) => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "success": false,
                    "error": format!("no configuration for location {}", location_id),
                })),
            )
                .into_response(),
            AppError::Upstream(message) => {
                tracing::warn!(error = %message, "upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "success": false, "error": message })),
                )
                    .into_response()
            }
            AppError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
