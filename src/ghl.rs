// src/ghl.rs
// GoHighLevel collaborator: OAuth code exchange & custom payment provider registration

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

const GHL_API_VERSION: &str = "2021-07-28";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhlToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default, rename = "locationId")]
    pub location_id: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Body of the custom-provider registration call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRegistration {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub query_url: String,
    pub payments_url: String,
}

impl ProviderRegistration {
    pub fn for_backend(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            name: "Papi Payment Gateway".to_string(),
            description: "Papi payment links for Madagascar and Africa".to_string(),
            image_url: "https://via.placeholder.com/100x100?text=PAPI".to_string(),
            query_url: format!("{}/query", base_url),
            payments_url: format!("{}/payment", base_url),
        }
    }
}

#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<GhlToken, ClientError>;

    async fn register_provider(
        &self,
        location_id: &str,
        access_token: &str,
        registration: &ProviderRegistration,
    ) -> Result<(), ClientError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATED CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct SimulatedCrmClient;

#[async_trait]
impl CrmClient for SimulatedCrmClient {
    async fn exchange_code(&self, _code: &str) -> Result<GhlToken, ClientError> {
        tracing::info!("simulated GHL code exchange");
        Ok(GhlToken {
            access_token: format!("sim_{}", uuid::Uuid::new_v4().simple()),
            refresh_token: None,
            expires_in: Some(86_399),
            location_id: None,
            scope: None,
        })
    }

    async fn register_provider(
        &self,
        location_id: &str,
        _access_token: &str,
        registration: &ProviderRegistration,
    ) -> Result<(), ClientError> {
        tracing::info!(
            location_id,
            query_url = %registration.query_url,
            payments_url = %registration.payments_url,
            "simulated GHL provider registration"
        );
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct HttpCrmClient {
    http: Client,
    api_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl HttpCrmClient {
    pub fn new(
        http: Client,
        api_url: &str,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id: client_id.map(str::to_string),
            client_secret: client_secret.map(str::to_string),
        }
    }
}

#[async_trait]
impl CrmClient for HttpCrmClient {
    async fn exchange_code(&self, code: &str) -> Result<GhlToken, ClientError> {
        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret) else {
            return Err(ClientError::NotConfigured(
                "GHL_CLIENT_ID and GHL_CLIENT_SECRET are required".to_string(),
            ));
        };

        let url = format!("{}/oauth/token", self.api_url);
        let params = [
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("user_type", "Location"),
        ];

        let resp = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn register_provider(
        &self,
        location_id: &str,
        access_token: &str,
        registration: &ProviderRegistration,
    ) -> Result<(), ClientError> {
        let url = format!("{}/payments/custom-provider/provider", self.api_url);

        let resp = self
            .http
            .post(&url)
            .query(&[("locationId", location_id)])
            .bearer_auth(access_token)
            .header("Version", GHL_API_VERSION)
            .json(registration)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(location_id, "GHL provider registered");
        Ok(())
    }
}
