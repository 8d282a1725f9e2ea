// src/payment_handler.rs
// Embedded payment page & Papi payment links

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Html,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::papi::{PaymentLinkRequest, DEFAULT_VALID_DURATION};
use crate::state::AppState;
use crate::status_handler::host_header;
use crate::templates;

/// GET /payment
pub async fn payment_page() -> Html<&'static str> {
    Html(templates::payment_page())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkBody {
    pub location_id: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub reference: Option<String>,
    #[serde(default)]
    pub live: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkResponse {
    pub success: bool,
    pub payment_link: String,
    pub payment_reference: Option<String>,
    pub reference: String,
}

/// POST /api/payment-link
pub async fn create_payment_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PaymentLinkBody>, JsonRejection>,
) -> Result<Json<PaymentLinkResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let location_id = body
        .location_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("missing locationId".to_string()))?;
    let amount = body
        .amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::Validation("amount must be a positive number".to_string()))?;

    let record = state
        .store
        .get(&location_id)
        .await?
        .ok_or_else(|| AppError::MissingConfig(location_id.clone()))?;

    // The deployment-wide token only stands in when the operator set one.
    let api_token = match record.token(body.live) {
        Some(token) => token.to_string(),
        None if state.config.papi_token_configured => state.config.papi_api_token.clone(),
        None => {
            let environment = if body.live { "live" } else { "test" };
            return Err(AppError::Validation(format!(
                "no {} token configured",
                environment
            )));
        }
    };

    let backend_url = state.config.public_url(host_header(&headers));
    let reference = body
        .reference
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| format!("GHL-{}", Utc::now().timestamp_millis()));

    let request = PaymentLinkRequest {
        amount,
        client_name: body.client_name.unwrap_or_else(|| "Customer".to_string()),
        description: body
            .description
            .unwrap_or_else(|| format!("Payment {}", reference)),
        reference: reference.clone(),
        notification_url: format!("{}/webhooks/papi", backend_url),
        success_url: format!("{}/payment?status=success", backend_url),
        failure_url: format!("{}/payment?status=failure", backend_url),
        valid_duration: DEFAULT_VALID_DURATION,
    };

    let link = state
        .papi
        .create_payment_link(&api_token, &request)
        .await
        .map_err(|e| AppError::Upstream(format!("Papi: {}", e)))?;

    tracing::info!(
        %location_id,
        %reference,
        live = body.live,
        "payment link created"
    );

    Ok(Json(PaymentLinkResponse {
        success: true,
        payment_link: link.payment_link,
        payment_reference: link.payment_reference,
        reference,
    }))
}
