use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub adsense: AdSenseConfig,
    pub monetization: MonetizationConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Returns the `host:port` bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Endpoints and limits for the AdSense Management API.
///
/// Credentials are never read from this file; they come from the
/// environment (see `ifrit_adsense::AdSenseAuthConfig`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdSenseConfig {
    pub api_url: String,
    pub token_url: String,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonetizationConfig {
    /// Default `limit` for top-content queries.
    pub top_content_limit: usize,
    /// Days of history pulled by a revenue sync.
    pub sync_lookback_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub drafts_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            adsense: AdSenseConfig {
                api_url: "https://adsense.googleapis.com/v2".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
                requests_per_minute: 60,
                timeout_secs: 30,
            },
            monetization: MonetizationConfig {
                top_content_limit: 10,
                sync_lookback_days: 30,
            },
            content: ContentConfig {
                drafts_dir: "drafts".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert!(config.adsense.api_url.starts_with("https://"));
        assert_eq!(config.monetization.top_content_limit, 10);
        assert_eq!(config.content.drafts_dir, "drafts");
    }
}
