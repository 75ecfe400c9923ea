//! OAuth2 refresh-token authentication for the AdSense API.
//!
//! AdSense calls carry a short-lived bearer token obtained by exchanging a
//! long-lived refresh token at Google's token endpoint. The token is cached
//! until shortly before it expires.
//!
//! # Security
//!
//! - Client secret and refresh token are held as `SecretString`
//! - Secrets are never logged; `Debug` output is redacted
//!
//! # Example
//!
//! ```ignore
//! use ifrit_adsense::auth::{AdSenseAuth, AdSenseAuthConfig, AdSenseCredentials};
//!
//! let credentials = AdSenseCredentials::from_env(&AdSenseAuthConfig::default())?;
//! let auth = AdSenseAuth::new(credentials, "https://oauth2.googleapis.com/token", reqwest::Client::new());
//! let token = auth.access_token().await?;
//! ```

use crate::error::{AdSenseError, Result};
use parking_lot::Mutex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::{Duration, Instant};
use zeroize::Zeroize;

/// Tokens are treated as expired this long before Google says they are.
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

// =============================================================================
// Configuration
// =============================================================================

/// Names of the environment variables holding AdSense credentials.
#[derive(Debug, Clone)]
pub struct AdSenseAuthConfig {
    pub client_id_env: String,
    pub client_secret_env: String,
    pub refresh_token_env: String,
}

impl Default for AdSenseAuthConfig {
    fn default() -> Self {
        Self {
            client_id_env: "ADSENSE_CLIENT_ID".to_string(),
            client_secret_env: "ADSENSE_CLIENT_SECRET".to_string(),
            refresh_token_env: "ADSENSE_REFRESH_TOKEN".to_string(),
        }
    }
}

impl AdSenseAuthConfig {
    /// Sets custom environment variable names.
    #[must_use]
    pub fn with_env_vars(
        mut self,
        client_id_env: impl Into<String>,
        client_secret_env: impl Into<String>,
        refresh_token_env: impl Into<String>,
    ) -> Self {
        self.client_id_env = client_id_env.into();
        self.client_secret_env = client_secret_env.into();
        self.refresh_token_env = refresh_token_env.into();
        self
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// OAuth2 client credentials plus a long-lived refresh token.
pub struct AdSenseCredentials {
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
}

impl std::fmt::Debug for AdSenseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdSenseCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

impl Drop for AdSenseCredentials {
    fn drop(&mut self) {
        self.client_id.zeroize();
    }
}

impl AdSenseCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    /// Reads credentials from the environment variables named in `config`.
    ///
    /// # Errors
    /// Returns a configuration error naming the first missing or empty variable.
    pub fn from_env(config: &AdSenseAuthConfig) -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    AdSenseError::Configuration(format!("missing environment variable: {name}"))
                })
        };

        let client_id = read(&config.client_id_env)?;
        let client_secret = read(&config.client_secret_env)?;
        let refresh_token = read(&config.refresh_token_env)?;

        Ok(Self::new(client_id, client_secret, refresh_token))
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

// =============================================================================
// Token Exchange
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    #[allow(dead_code)]
    token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTokenError {
    error: Option<String>,
    error_description: Option<String>,
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Exchanges the refresh token for access tokens and caches the result.
pub struct AdSenseAuth {
    credentials: AdSenseCredentials,
    token_url: String,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for AdSenseAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdSenseAuth")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .field("cached", &self.cached.lock().is_some())
            .finish()
    }
}

impl AdSenseAuth {
    pub fn new(credentials: AdSenseCredentials, token_url: impl Into<String>, http: Client) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            http,
            cached: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &AdSenseCredentials {
        &self.credentials
    }

    /// Returns a valid access token, refreshing it when the cached one is
    /// missing or within [`TOKEN_EXPIRY_MARGIN`] of expiry.
    ///
    /// # Errors
    /// Returns an error if the token endpoint rejects the refresh.
    pub async fn access_token(&self) -> Result<SecretString> {
        {
            let cached = self.cached.lock();
            if let Some(cached) = cached.as_ref() {
                if Instant::now() < cached.refresh_at {
                    return Ok(SecretString::from(cached.token.expose_secret().to_string()));
                }
            }
        }
        self.refresh().await
    }

    /// Forces a token refresh.
    ///
    /// # Errors
    /// Returns `Authentication` when Google rejects the credentials, or a
    /// transport error.
    pub async fn refresh(&self) -> Result<SecretString> {
        tracing::debug!(token_url = %self.token_url, "Refreshing AdSense access token");

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.expose_secret()),
            ("refresh_token", self.credentials.refresh_token.expose_secret()),
        ];

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RawTokenError>(&text)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or(text);
            return Err(if matches!(status.as_u16(), 400 | 401 | 403) {
                AdSenseError::Authentication(message)
            } else {
                AdSenseError::api(status.as_u16(), message)
            });
        }

        let raw: RawTokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(raw.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS));
        let refresh_at = Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN);

        let token = SecretString::from(raw.access_token);
        let result = SecretString::from(token.expose_secret().to_string());
        *self.cached.lock() = Some(CachedToken { token, refresh_at });

        Ok(result)
    }

    /// Drops the cached token so the next call refreshes.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}
