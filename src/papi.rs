// src/papi.rs
// Papi collaborator: payment-link creation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Minutes a payment link stays valid.
pub const DEFAULT_VALID_DURATION: u32 = 60;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkRequest {
    pub amount: f64,
    pub client_name: String,
    pub description: String,
    pub reference: String,
    pub notification_url: String,
    pub success_url: String,
    pub failure_url: String,
    pub valid_duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub payment_link: String,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[async_trait]
pub trait PapiClient: Send + Sync {
    async fn create_payment_link(
        &self,
        api_token: &str,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, ClientError>;
}

#[derive(Clone, Default)]
pub struct SimulatedPapiClient;

#[async_trait]
impl PapiClient for SimulatedPapiClient {
    async fn create_payment_link(
        &self,
        _api_token: &str,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, ClientError> {
        let payment_reference = format!("PAPI-{:010}", rand::random::<u32>());
        tracing::info!(
            reference = %request.reference,
            amount = request.amount,
            payment_reference = %payment_reference,
            "simulated Papi payment link"
        );
        Ok(PaymentLink {
            payment_link: format!("https://app.papi.mg/pay/{}", payment_reference),
            payment_reference: Some(payment_reference),
        })
    }
}

#[derive(Clone)]
pub struct HttpPapiClient {
    http: Client,
    api_url: String,
}

impl HttpPapiClient {
    pub fn new(http: Client, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PapiClient for HttpPapiClient {
    async fn create_payment_link(
        &self,
        api_token: &str,
        request: &PaymentLinkRequest,
    ) -> Result<PaymentLink, ClientError> {
        let url = format!("{}/payment-links/create", self.api_url);

        let resp = self
            .http
            .post(&url)
            .header("Token", api_token)
            .json(request)
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

        parse_payment_link(&body)
    }
}

// Papi wraps results in `data` on some endpoints and not on others.
fn parse_payment_link(body: &str) -> Result<PaymentLink, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let payload = value.get("data").cloned().unwrap_or(value);
    Ok(serde_json::from_value(payload)?)
}
