// src/state.rs
// Shared application state

use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::{AppConfig, IntegrationMode};
use crate::error::{ClientError, StartupError};
use crate::ghl::{CrmClient, GhlToken, HttpCrmClient, SimulatedCrmClient};
use crate::papi::{HttpPapiClient, PapiClient, SimulatedPapiClient};
use crate::store::{open_store, ConfigStore};

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ConfigStore>,
    pub crm: Arc<dyn CrmClient>,
    pub papi: Arc<dyn PapiClient>,
    /// GHL access tokens obtained through the OAuth callback, keyed by location.
    pub ghl_tokens: Arc<RwLock<HashMap<String, GhlToken>>>,
}

impl AppState {
    /// Picks the store from `REDIS_URL` and the clients from the integration mode.
    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let store = open_store(config.redis_url.as_deref()).await?;
        Ok(Self::with_store(config, store)?)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn ConfigStore>) -> Result<Self, ClientError> {
        let (crm, papi): (Arc<dyn CrmClient>, Arc<dyn PapiClient>) = match config.mode {
            IntegrationMode::Simulated => (Arc::new(SimulatedCrmClient), Arc::new(SimulatedPapiClient)),
            IntegrationMode::Live => {
                let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
                (
                    Arc::new(HttpCrmClient::new(
                        http.clone(),
                        &config.ghl_api_url,
                        config.ghl_client_id.as_deref(),
                        config.ghl_client_secret.as_deref(),
                    )),
                    Arc::new(HttpPapiClient::new(http, &config.papi_api_url)),
                )
            }
        };

        Ok(Self::with_clients(config, store, crm, papi))
    }

    pub fn with_clients(
        config: AppConfig,
        store: Arc<dyn ConfigStore>,
        crm: Arc<dyn CrmClient>,
        papi: Arc<dyn PapiClient>,
    ) -> Self {
        Self {
            config,
            store,
            crm,
            papi,
            ghl_tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn remember_ghl_token(&self, location_id: &str, token: GhlToken) {
        let mut tokens = self.ghl_tokens.write().await;
        tokens.insert(location_id.to_string(), token);
    }

    /// Token from the install flow for this location, else `GHL_ACCESS_TOKEN`.
    pub async fn ghl_access_token(&self, location_id: &str) -> Option<String> {
        {
            let tokens = self.ghl_tokens.read().await;
            if let Some(token) = tokens.get(location_id) {
                return Some(token.access_token.clone());
            }
        }
        self.config.ghl_access_token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryConfigStore;

    fn token(value: &str) -> GhlToken {
        GhlToken {
            access_token: value.to_string(),
            refresh_token: None,
            expires_in: None,
            location_id: None,
            scope: None,
        }
    }

    #[tokio::test]
    async fn cached_token_wins_over_env_fallback() {
        let config = AppConfig {
            ghl_access_token: Some("env-token".to_string()),
            ..AppConfig::default()
        };
        let state = AppState::with_store(config, Arc::new(InMemoryConfigStore::new())).unwrap();

        assert_eq!(state.ghl_access_token("loc1").await.as_deref(), Some("env-token"));
        state.remember_ghl_token("loc1", token("oauth-token")).await;
        assert_eq!(state.ghl_access_token("loc1").await.as_deref(), Some("oauth-token"));
    }

    #[tokio::test]
    async fn startup_without_reachable_redis_still_serves() {
        let config = AppConfig {
            redis_url: Some("redis://127.0.0.1:1/".to_string()),
            ..AppConfig::default()
        };
        let state = AppState::from_config(config).await.unwrap();
        state.store.put(Some("loc1"), Some("t"), None).await.unwrap();
        assert_eq!(state.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn no_token_without_install_or_env() {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(InMemoryConfigStore::new())).unwrap();
        assert!(state.ghl_access_token("loc1").await.is_none());
    }
}
