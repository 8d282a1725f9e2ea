// src/templates.rs
// HTML pages served to the browser / GHL iframe

use askama::Template;

const PAYMENT_PAGE: &str = include_str!("../templates/payment.html");

pub const REDIRECT_COUNTDOWN_SECS: u32 = 5;

/// GET /config. Values are HTML-escaped by askama.
#[derive(Template)]
#[template(path = "config.html")]
pub struct ConfigPage {
    pub location_id: String,
    pub backend_url: String,
    pub rendered_at: String,
}

#[derive(Template)]
#[template(path = "auth_callback.html")]
pub struct AuthCallbackPage {
    pub location_label: String,
    pub code_status: &'static str,
    pub rendered_at: String,
    /// Already URL-encoded.
    pub config_query: String,
    pub countdown: u32,
}

impl AuthCallbackPage {
    pub fn new(location_id: Option<&str>, code_received: bool, rendered_at: String) -> Self {
        let target = location_id.unwrap_or("demo");
        let config_query = serde_urlencoded::to_string(&[("locationId", target)])
            .unwrap_or_else(|_| "locationId=demo".to_string());

        Self {
            location_label: location_id.unwrap_or("not provided").to_string(),
            code_status: if code_received { "received" } else { "missing" },
            rendered_at,
            config_query,
            countdown: REDIRECT_COUNTDOWN_SECS,
        }
    }
}

pub fn payment_page() -> &'static str {
    PAYMENT_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_page_embeds_location() {
        let html = ConfigPage {
            location_id: "loc-42".to_string(),
            backend_url: "https://papi.example.com".to_string(),
            rendered_at: "2024-01-01T00:00:00Z".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"data-location-id="loc-42""#));
        assert!(html.contains("papi.example.com"));
        assert!(html.contains("/api/save-config"));
    }

    #[test]
    fn config_page_escapes_location() {
        let html = ConfigPage {
            location_id: r#""><b>x"#.to_string(),
            backend_url: String::new(),
            rendered_at: String::new(),
        }
        .render()
        .unwrap();
        assert!(!html.contains("<b>x"));
        assert!(html.contains("&quot;&gt;&lt;b&gt;x"));
    }

    #[test]
    fn auth_callback_links_to_config_with_encoded_location() {
        let html = AuthCallbackPage::new(Some("loc 1&x"), true, "now".to_string())
            .render()
            .unwrap();
        assert!(html.contains(r#"href="/config?locationId=loc+1%26x""#));
        assert!(html.contains("loc 1&amp;x"));
        assert!(html.contains("received"));
    }

    #[test]
    fn auth_callback_defaults_to_demo_location() {
        let page = AuthCallbackPage::new(None, false, "now".to_string());
        assert_eq!(page.config_query, "locationId=demo");
        assert_eq!(page.location_label, "not provided");

        let html = page.render().unwrap();
        assert!(html.contains("/config?locationId=demo"));
        assert!(html.contains("missing"));
    }

    #[test]
    fn payment_page_speaks_host_contract() {
        let html = payment_page();
        for message in [
            "custom_provider_ready",
            "payment_initiate_props",
            "custom_element_success_response",
            "custom_element_error_response",
        ] {
            assert!(html.contains(message), "missing {}", message);
        }
    }
}
