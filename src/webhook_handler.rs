// src/webhook_handler.rs
// Papi payment notifications & GHL app lifecycle webhooks

use axum::{body::Bytes, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PapiNotification {
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub fee: Option<serde_json::Value>,
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub merchant_payment_reference: Option<String>,
    pub payment_reference: Option<String>,
    // Present in payloads; only its presence is ever logged.
    pub notification_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhlEvent {
    pub event: Option<String>,
    pub location_id: Option<String>,
    pub app_id: Option<String>,
}

// Webhooks are always acknowledged, so an unreadable body degrades to an empty event.
fn parse_or_default<T: DeserializeOwned + Default>(source: &str, body: &[u8]) -> T {
    match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(source, error = %e, "unparseable webhook body");
            T::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/papi
pub async fn papi_webhook(body: Bytes) -> impl IntoResponse {
    tracing::debug!(payload = %String::from_utf8_lossy(&body), "papi webhook payload");
    let event: PapiNotification = parse_or_default("papi", &body);
    let reference = event.payment_reference.as_deref().unwrap_or("unknown");

    match event.payment_status.as_deref() {
        Some("SUCCESS") => tracing::info!(
            reference,
            merchant_reference = ?event.merchant_payment_reference,
            amount = ?event.amount,
            fee = ?event.fee,
            client = ?event.client_name,
            method = ?event.payment_method,
            description = ?event.description,
            "Papi payment confirmed"
        ),
        Some("FAILED") => tracing::warn!(reference, "Papi payment failed"),
        Some("PENDING") => tracing::info!(reference, "Papi payment pending"),
        other => tracing::info!(reference, status = ?other, "unhandled Papi status"),
    }
    tracing::debug!(has_token = event.notification_token.is_some(), "papi notification token");

    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "received": true,
            "paymentReference": reference,
            "timestamp": Utc::now().to_rfc3339(),
            "processed": true,
        })),
    )
}

/// POST /webhooks/ghl
pub async fn ghl_webhook(body: Bytes) -> impl IntoResponse {
    tracing::debug!(payload = %String::from_utf8_lossy(&body), "ghl webhook payload");
    let event: GhlEvent = parse_or_default("ghl", &body);
    let location_id = event.location_id.as_deref().unwrap_or("unknown");
    let name = event.event.as_deref().unwrap_or("unknown");

    match name {
        "app.installed" => tracing::info!(location_id, app_id = ?event.app_id, "app installed"),
        "app.uninstalled" => tracing::info!(location_id, app_id = ?event.app_id, "app uninstalled"),
        "subscription.created" => tracing::info!(location_id, "subscription created"),
        "subscription.updated" => tracing::info!(location_id, "subscription updated"),
        _ => tracing::info!(location_id, event = name, "unhandled GHL event"),
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "event": name,
            "locationId": location_id,
            "timestamp": Utc::now().to_rfc3339(),
            "processed": true,
        })),
    )
}
