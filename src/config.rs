// src/config.rs
// Environment-driven configuration for the Papi <-> GoHighLevel backend

use std::fmt;

pub const DEFAULT_PAPI_TOKEN: &str = "papi_demo_token";
pub const DEFAULT_PAPI_API_URL: &str = "https://app.papi.mg/dashboard/api";
pub const DEFAULT_GHL_API_URL: &str = "https://services.leadconnectorhq.com";

// ═══════════════════════════════════════════════════════════════════════════════
// INTEGRATION MODE
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether external collaborators are called for real or simulated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMode {
    Simulated,
    Live,
}

impl IntegrationMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simulated" | "simulation" | "demo" => Some(IntegrationMode::Simulated),
            "live" | "real" => Some(IntegrationMode::Live),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationMode::Simulated => "simulated",
            IntegrationMode::Live => "live",
        }
    }
}

impl fmt::Display for IntegrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// APP CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub papi_api_token: String,
    /// True when `PAPI_API_TOKEN` was set rather than defaulted.
    pub papi_token_configured: bool,
    pub papi_api_url: String,
    /// GHL OAuth app credentials; unset means the code exchange cannot run.
    pub ghl_client_id: Option<String>,
    pub ghl_client_secret: Option<String>,
    pub ghl_access_token: Option<String>,
    pub ghl_api_url: String,
    pub backend_url: Option<String>,
    pub redis_url: Option<String>,
    pub mode: IntegrationMode,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let papi_token = non_empty_var("PAPI_API_TOKEN");
        let mode = match non_empty_var("INTEGRATION_MODE") {
            Some(raw) => IntegrationMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown INTEGRATION_MODE, falling back to simulated");
                IntegrationMode::Simulated
            }),
            None => IntegrationMode::Simulated,
        };

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            papi_token_configured: papi_token.is_some(),
            papi_api_token: papi_token.unwrap_or_else(|| DEFAULT_PAPI_TOKEN.to_string()),
            papi_api_url: non_empty_var("PAPI_API_URL")
                .unwrap_or_else(|| DEFAULT_PAPI_API_URL.to_string()),
            ghl_client_id: non_empty_var("GHL_CLIENT_ID"),
            ghl_client_secret: non_empty_var("GHL_CLIENT_SECRET"),
            ghl_access_token: non_empty_var("GHL_ACCESS_TOKEN"),
            ghl_api_url: non_empty_var("GHL_API_URL")
                .unwrap_or_else(|| DEFAULT_GHL_API_URL.to_string()),
            backend_url: non_empty_var("BACKEND_URL")
                .or_else(|| non_empty_var("VERCEL_URL"))
                .map(|url| normalize_base_url(&url)),
            redis_url: non_empty_var("REDIS_URL"),
            mode,
            environment: non_empty_var("APP_ENV").unwrap_or_else(|| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Public base URL, preferring the configured one over the request's `Host`.
    pub fn public_url(&self, host: Option<&str>) -> String {
        match (&self.backend_url, host) {
            (Some(url), _) => url.clone(),
            (None, Some(host)) => normalize_base_url(host),
            (None, None) => format!("http://localhost:{}", self.port),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            papi_api_token: DEFAULT_PAPI_TOKEN.to_string(),
            papi_token_configured: false,
            papi_api_url: DEFAULT_PAPI_API_URL.to_string(),
            ghl_client_id: None,
            ghl_client_secret: None,
            ghl_access_token: None,
            ghl_api_url: DEFAULT_GHL_API_URL.to_string(),
            backend_url: None,
            redis_url: None,
            mode: IntegrationMode::Simulated,
            environment: "development".to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// Hosting platforms hand out bare hostnames, so default those to https.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
