// src/store.rs
// Per-location Papi credentials (in-memory or Redis)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StoreError;

// ═══════════════════════════════════════════════════════════════════════════════
// INTEGRATION RECORD
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    pub location_id: String,
    pub test_token: Option<String>,
    pub live_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl IntegrationConfig {
    /// Validates the inputs and builds a fresh record. Empty strings count as absent.
    pub fn new(
        location_id: Option<&str>,
        test_token: Option<&str>,
        live_token: Option<&str>,
    ) -> Result<Self, StoreError> {
        let location_id = present(location_id).ok_or(StoreError::MissingLocationId)?;
        let test_token = present(test_token);
        let live_token = present(live_token);
        if test_token.is_none() && live_token.is_none() {
            return Err(StoreError::MissingToken);
        }

        let now = Utc::now();
        Ok(Self {
            location_id,
            test_token,
            live_token,
            created_at: now,
            last_updated: now,
        })
    }

    /// Token for the requested environment.
    pub fn token(&self, live: bool) -> Option<&str> {
        if live {
            self.live_token.as_deref()
        } else {
            self.test_token.as_deref()
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

// ═══════════════════════════════════════════════════════════════════════════════
// STORE CONTRACT
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Insert or fully overwrite the record for its location.
    async fn save(&self, record: IntegrationConfig) -> Result<(), StoreError>;

    async fn get(&self, location_id: &str) -> Result<Option<IntegrationConfig>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Validate and store. Nothing is written when validation fails.
    async fn put(
        &self,
        location_id: Option<&str>,
        test_token: Option<&str>,
        live_token: Option<&str>,
    ) -> Result<IntegrationConfig, StoreError> {
        let record = IntegrationConfig::new(location_id, test_token, live_token)?;
        self.save(record.clone()).await?;
        Ok(record)
    }
}

/// Process-local store. Grows without bound and is lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    records: Arc<RwLock<HashMap<String, IntegrationConfig>>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn save(&self, record: IntegrationConfig) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(record.location_id.clone(), record);
        Ok(())
    }

    async fn get(&self, location_id: &str) -> Result<Option<IntegrationConfig>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(location_id).cloned())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REDIS STORE
// ═══════════════════════════════════════════════════════════════════════════════

const RECORD_PREFIX: &str = "integration:";
const INDEX_KEY: &str = "integrations";

/// Durable store. Once chosen, every call goes to Redis and a lost connection
/// surfaces as `StoreError::Backend`.
#[derive(Clone)]
pub struct RedisConfigStore {
    client: redis::Client,
}

impl RedisConfigStore {
    pub fn open(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
        })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn record_key(location_id: &str) -> String {
    format!("{}{}", RECORD_PREFIX, location_id)
}

#[async_trait]
impl ConfigStore for RedisConfigStore {
    async fn save(&self, record: IntegrationConfig) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        let json = serde_json::to_string(&record)?;
        let () = redis::pipe()
            .atomic()
            .set(record_key(&record.location_id), json)
            .ignore()
            .sadd(INDEX_KEY, record.location_id.as_str())
            .ignore()
            .query_async(&mut con)
            .await?;
        Ok(())
    }

    async fn get(&self, location_id: &str) -> Result<Option<IntegrationConfig>, StoreError> {
        let mut con = self.connection().await?;
        let raw: Option<String> = con.get(record_key(location_id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let mut con = self.connection().await?;
        let count: usize = con.scard(INDEX_KEY).await?;
        Ok(count)
    }
}

/// Picks the backend once for the whole process: Redis when `redis_url` is set
/// and answers, otherwise the in-memory map. A bad URL is a startup error.
pub async fn open_store(redis_url: Option<&str>) -> Result<Arc<dyn ConfigStore>, StoreError> {
    let Some(url) = redis_url else {
        tracing::info!("using in-memory config store (not durable)");
        return Ok(Arc::new(InMemoryConfigStore::new()));
    };

    let store = RedisConfigStore::open(url)?;
    match store.ping().await {
        Ok(()) => {
            tracing::info!("using Redis config store");
            Ok(Arc::new(store))
        }
        Err(e) => {
            tracing::warn!(error = %e, "redis unreachable at startup, using in-memory config store");
            Ok(Arc::new(InMemoryConfigStore::new()))
        }
    }
}
