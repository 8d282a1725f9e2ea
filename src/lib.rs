// src/lib.rs
// Papi <-> GoHighLevel payment glue: router assembly

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth_handler;
pub mod config;
pub mod config_handler;
pub mod error;
pub mod ghl;
pub mod papi;
pub mod payment_handler;
pub mod query_handler;
pub mod shutdown;
pub mod state;
pub mod status_handler;
pub mod store;
pub mod templates;
pub mod webhook_handler;

use auth_handler::auth_callback;
use config_handler::{config_page, save_config};
use payment_handler::{create_payment_link, payment_page};
use query_handler::query;
use state::AppState;
use status_handler::{health, home, method_not_allowed, not_found};
use webhook_handler::{ghl_webhook, papi_webhook};

/// Echoed back in 404 responses.
pub const AVAILABLE_ROUTES: &[&str] = &[
    "/",
    "/config",
    "/payment",
    "/auth/callback",
    "/query",
    "/api/test",
    "/api/save-config",
    "/api/payment-link",
    "/webhooks/papi",
    "/webhooks/ghl",
];

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let expose_panics = !state.config.is_production();

    Router::new()
        .route("/", get(home).fallback(method_not_allowed))
        .route("/api", get(home).fallback(method_not_allowed))
        .route("/config", get(config_page).fallback(method_not_allowed))
        .route("/api/save-config", post(save_config).fallback(method_not_allowed))
        .route("/api/test", get(health).fallback(method_not_allowed))
        .route("/api/hello", get(health).fallback(method_not_allowed))
        .route("/payment", get(payment_page).fallback(method_not_allowed))
        .route("/api/payment-link", post(create_payment_link).fallback(method_not_allowed))
        .route("/auth/callback", get(auth_callback).fallback(method_not_allowed))
        .route("/query", post(query).fallback(method_not_allowed))
        .route("/webhooks/papi", post(papi_webhook).fallback(method_not_allowed))
        .route("/webhooks/ghl", post(ghl_webhook).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| panic_response(err, expose_panics),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn panic_response(err: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");

    let body = if expose {
        json!({ "success": false, "error": "internal server error", "message": detail })
    } else {
        json!({ "success": false, "error": "internal server error" })
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
