// src/config_handler.rs
// Configuration page & credential saving

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::ghl::ProviderRegistration;
use crate::state::AppState;
use crate::status_handler::host_header;
use crate::store::IntegrationConfig;
use crate::templates;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPageParams {
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigRequest {
    pub location_id: Option<String>,
    pub test_token: Option<String>,
    pub live_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigResponse {
    pub success: bool,
    pub message: String,
    pub location_id: String,
    pub timestamp: String,
}

/// GET /config
pub async fn config_page(
    State(state): State<AppState>,
    Query(params): Query<ConfigPageParams>,
    headers: HeaderMap,
) -> templates::ConfigPage {
    let location_id = params
        .location_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("demo-{}", Utc::now().timestamp_millis()));
    let backend_url = state.config.public_url(host_header(&headers));

    templates::ConfigPage {
        location_id,
        backend_url,
        rendered_at: Utc::now().to_rfc3339(),
    }
}

/// POST /api/save-config
pub async fn save_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SaveConfigRequest>, JsonRejection>,
) -> Result<Json<SaveConfigResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let record = match state
        .store
        .put(
            body.location_id.as_deref(),
            body.test_token.as_deref(),
            body.live_token.as_deref(),
        )
        .await
    {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "rejected configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        location_id = %record.location_id,
        has_test = record.test_token.is_some(),
        has_live = record.live_token.is_some(),
        "configuration saved"
    );

    let backend_url = state.config.public_url(host_header(&headers));
    register_integration(&state, &record, &backend_url).await;

    Ok(Json(SaveConfigResponse {
        success: true,
        message: "Configuration saved".to_string(),
        location_id: record.location_id,
        timestamp: record.last_updated.to_rfc3339(),
    }))
}

/// Registers the location as a custom payment provider in GHL. Never fails the save.
async fn register_integration(state: &AppState, record: &IntegrationConfig, backend_url: &str) {
    let Some(access_token) = state.ghl_access_token(&record.location_id).await else {
        tracing::info!(
            location_id = %record.location_id,
            "no GHL access token, provider registration deferred"
        );
        return;
    };

    let registration = ProviderRegistration::for_backend(backend_url);
    if let Err(e) = state
        .crm
        .register_provider(&record.location_id, &access_token, &registration)
        .await
    {
        tracing::warn!(
            location_id = %record.location_id,
            error = %e,
            "GHL provider registration failed (non-blocking)"
        );
    }
}
