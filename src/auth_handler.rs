// src/auth_handler.rs
// GHL marketplace OAuth install callback

use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;

use crate::config::IntegrationMode;
use crate::error::AppError;
use crate::state::AppState;
use crate::templates;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCallbackParams {
    pub code: Option<String>,
    pub location_id: Option<String>,
}

/// GET /auth/callback
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(params): Query<AuthCallbackParams>,
) -> Result<templates::AuthCallbackPage, AppError> {
    let code = params.code.filter(|c| !c.is_empty());
    let mut location_id = params.location_id.filter(|id| !id.is_empty());

    tracing::info!(
        code_received = code.is_some(),
        location_id = location_id.as_deref().unwrap_or("none"),
        "OAuth callback"
    );

    if let (IntegrationMode::Live, Some(code)) = (state.config.mode, code.as_deref()) {
        let token = state
            .crm
            .exchange_code(code)
            .await
            .map_err(|e| AppError::Internal(format!("GHL token exchange failed: {}", e)))?;

        if location_id.is_none() {
            location_id = token.location_id.clone();
        }
        match location_id.as_deref() {
            Some(id) => state.remember_ghl_token(id, token).await,
            None => tracing::warn!("GHL token received without a location, not cached"),
        }
    }

    Ok(templates::AuthCallbackPage::new(
        location_id.as_deref(),
        code.is_some(),
        Utc::now().to_rfc3339(),
    ))
}
