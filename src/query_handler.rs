// src/query_handler.rs
// GHL payment query endpoint (verify / refund / saved methods)

use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub transaction_id: Option<String>,
    pub charge_id: Option<String>,
    pub location_id: Option<String>,
    pub contact_id: Option<String>,
    pub payment_method_id: Option<String>,
}

/// POST /query
pub async fn query(payload: Result<Json<QueryRequest>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    tracing::info!(
        kind = request.kind.as_deref().unwrap_or("none"),
        transaction_id = request.transaction_id.as_deref().unwrap_or("none"),
        charge_id = request.charge_id.as_deref().unwrap_or("none"),
        location_id = request.location_id.as_deref().unwrap_or("none"),
        "query received"
    );

    Ok(Json(answer(&request)))
}

/// Verification is a stub that trusts every charge the payment page reported.
pub fn answer(request: &QueryRequest) -> Value {
    match request.kind.as_deref() {
        Some("verify") => {
            tracing::info!(charge_id = ?request.charge_id, "payment verified");
            json!({ "success": true, "message": "Payment verified" })
        }
        Some("refund") => {
            tracing::info!(charge_id = ?request.charge_id, "refund requested");
            json!({ "success": false, "error": "not implemented" })
        }
        Some("list_payment_methods") => {
            tracing::info!(contact_id = ?request.contact_id, "listing saved payment methods");
            json!([])
        }
        Some("charge_payment") => {
            tracing::info!(payment_method_id = ?request.payment_method_id, "charge on saved method requested");
            json!({ "success": false, "error": "charge_payment not implemented" })
        }
        other => {
            let kind = other.unwrap_or("(none)");
            tracing::warn!(kind, "unsupported query type");
            json!({ "success": false, "error": format!("unsupported type: {}", kind) })
        }
    }
}
