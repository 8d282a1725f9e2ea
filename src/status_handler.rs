// src/status_handler.rs
// Manifest, health check & routing fallbacks

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "Papi-GHL Integration";

pub(crate) fn host_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::HOST).and_then(|h| h.to_str().ok())
}

fn env_summary(state: &AppState) -> Value {
    json!({
        "hasToken": state.config.papi_token_configured,
        "mode": state.config.mode.as_str(),
    })
}

/// GET / and /api
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "status": "Papi-GHL backend running",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "url": state.config.public_url(host_header(&headers)),
        "endpoints": {
            "config": "/config",
            "payment": "/payment",
            "auth": "/auth/callback",
            "query": "/query",
            "test": "/api/test",
            "saveConfig": "/api/save-config",
            "paymentLink": "/api/payment-link",
            "webhooks": {
                "papi": "/webhooks/papi",
                "ghl": "/webhooks/ghl",
            },
        },
        "env": env_summary(&state),
    }))
}

/// GET /api/test and /api/hello
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = state.store.count().await?;

    Ok(Json(json!({
        "status": "OK",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339(),
        "configurationsCount": count,
        "env": env_summary(&state),
    })))
}

pub async fn not_found(method: Method, uri: Uri) -> AppError {
    tracing::debug!(%method, path = uri.path(), "no route");
    AppError::NotFound {
        path: uri.path().to_string(),
        method: method.to_string(),
    }
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed {
        path: uri.path().to_string(),
        method: method.to_string(),
    }
}
