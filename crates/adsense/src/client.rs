//! AdSense Management API v2 client with rate limiting.
//!
//! Requests are bearer-authenticated with a token from [`AdSenseAuth`] and
//! throttled with the governor crate.
//!
//! # Example
//!
//! ```ignore
//! use ifrit_adsense::{AdSenseClient, AdSenseClientConfig, ReportRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AdSenseClient::new(AdSenseClientConfig::default())?;
//!     let accounts = client.list_accounts().await?;
//!     let report = client
//!         .generate_report(&accounts[0].name, &ReportRequest::daily_earnings(start, end))
//!         .await?;
//!     println!("{} rows", report.rows.len());
//!     Ok(())
//! }
//! ```

use crate::auth::{AdSenseAuth, AdSenseAuthConfig, AdSenseCredentials};
use crate::error::{AdSenseError, Result};
use crate::types::{Account, Header, HeaderType, Report, ReportRequest, Row, Site};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use governor::{Quota, RateLimiter};
use ifrit_monetization::{RevenueDataPoint, RevenueSource};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;

// =============================================================================
// Constants
// =============================================================================

/// AdSense Management API v2 base URL.
pub const ADSENSE_API_URL: &str = "https://adsense.googleapis.com/v2";

/// Google OAuth2 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct AdSenseClientConfig {
    /// Base URL for the API.
    pub api_url: String,

    /// OAuth2 token endpoint.
    pub token_url: String,

    /// Where to find credentials in the environment.
    pub auth_config: AdSenseAuthConfig,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Account used for reports; the first listed account when unset.
    pub account: Option<String>,
}

impl Default for AdSenseClientConfig {
    fn default() -> Self {
        Self {
            api_url: ADSENSE_API_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            auth_config: AdSenseAuthConfig::default(),
            requests_per_minute: nonzero!(60u32),
            timeout_secs: 30,
            account: None,
        }
    }
}

impl From<&ifrit_core::AdSenseConfig> for AdSenseClientConfig {
    fn from(config: &ifrit_core::AdSenseConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            token_url: config.token_url.clone(),
            requests_per_minute: NonZeroU32::new(config.requests_per_minute)
                .unwrap_or(nonzero!(60u32)),
            timeout_secs: config.timeout_secs,
            ..Self::default()
        }
    }
}

impl AdSenseClientConfig {
    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the OAuth2 token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    #[must_use]
    pub fn with_auth_config(mut self, config: AdSenseAuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Pins the account used for reports.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}

// =============================================================================
// API Response Types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccountsResponse {
    accounts: Option<Vec<RawAccount>>,
    #[allow(dead_code)]
    next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    name: String,
    display_name: Option<String>,
    time_zone: Option<RawTimeZone>,
    state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTimeZone {
    id: Option<String>,
}

impl From<RawAccount> for Account {
    fn from(raw: RawAccount) -> Self {
        Self {
            display_name: raw.display_name.unwrap_or_else(|| raw.name.clone()),
            name: raw.name,
            time_zone: raw.time_zone.and_then(|tz| tz.id),
            state: raw.state,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSitesResponse {
    sites: Option<Vec<RawSite>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSite {
    name: String,
    domain: Option<String>,
    reporting_dimension_id: Option<String>,
    state: Option<String>,
    auto_ads_enabled: Option<bool>,
}

impl From<RawSite> for Site {
    fn from(raw: RawSite) -> Self {
        Self {
            name: raw.name,
            domain: raw.domain.unwrap_or_default(),
            reporting_dimension_id: raw.reporting_dimension_id,
            state: raw.state,
            auto_ads_enabled: raw.auto_ads_enabled.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    #[serde(default)]
    headers: Vec<RawHeader>,
    rows: Option<Vec<RawRow>>,
    totals: Option<RawRow>,
    // int64 fields arrive as JSON strings
    total_matched_rows: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHeader {
    name: String,
    #[serde(rename = "type")]
    header_type: Option<String>,
    currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRow {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCell {
    value: Option<String>,
}

impl From<RawHeader> for Header {
    fn from(raw: RawHeader) -> Self {
        Self {
            name: raw.name,
            header_type: raw
                .header_type
                .as_deref()
                .map_or(HeaderType::Unspecified, HeaderType::parse),
            currency_code: raw.currency_code,
        }
    }
}

impl From<RawRow> for Row {
    fn from(raw: RawRow) -> Self {
        Self {
            cells: raw.cells.into_iter().map(|c| c.value).collect(),
        }
    }
}

impl From<RawReport> for Report {
    fn from(raw: RawReport) -> Self {
        Self {
            headers: raw.headers.into_iter().map(Header::from).collect(),
            rows: raw
                .rows
                .unwrap_or_default()
                .into_iter()
                .map(Row::from)
                .collect(),
            totals: raw.totals.map(Row::from),
            total_matched_rows: raw
                .total_matched_rows
                .and_then(|n| n.parse().ok())
                .unwrap_or(0),
        }
    }
}

// =============================================================================
// AdSenseClient
// =============================================================================

/// AdSense Management API client.
pub struct AdSenseClient {
    config: AdSenseClientConfig,

    http: Client,

    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,

    auth: AdSenseAuth,
}

impl std::fmt::Debug for AdSenseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdSenseClient")
            .field("api_url", &self.config.api_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl AdSenseClient {
    /// Creates a client with credentials read from the environment.
    ///
    /// # Errors
    /// Returns a configuration error if credentials are missing.
    pub fn new(config: AdSenseClientConfig) -> Result<Self> {
        let credentials = AdSenseCredentials::from_env(&config.auth_config)?;
        Self::with_credentials(config, credentials)
    }

    /// Creates a client with explicit credentials.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_credentials(config: AdSenseClientConfig, credentials: AdSenseCredentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdSenseError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));
        let auth = AdSenseAuth::new(credentials, config.token_url.clone(), http.clone());

        Ok(Self {
            config,
            http,
            rate_limiter,
            auth,
        })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    #[must_use]
    pub fn config(&self) -> &AdSenseClientConfig {
        &self.config
    }

    /// Validates an account resource name (`accounts/pub-...`) so it can be
    /// spliced into a path.
    fn validate_account(account: &str) -> Result<&str> {
        let Some(id) = account.strip_prefix("accounts/") else {
            return Err(AdSenseError::InvalidRequest(format!(
                "account must look like accounts/pub-...: {account}"
            )));
        };

        if id.is_empty() || id.len() > 64 {
            return Err(AdSenseError::InvalidRequest(format!(
                "invalid account id length: {}",
                id.len()
            )));
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AdSenseError::InvalidRequest(format!(
                "invalid account id: must contain only alphanumeric, hyphen, or underscore: {id}"
            )));
        }

        Ok(account)
    }

    /// Waits for the rate limiter and makes an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.api_url, path);
        let token = self.auth.access_token().await?;

        tracing::debug!("GET {} params={}", url, query.len());

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .bearer_auth(token.expose_secret())
            .query(query)
            .send()
            .await?;

        let result = Self::handle_response(response).await;
        if result.as_ref().is_err_and(AdSenseError::is_auth_failure) {
            // Revoked or expired early; next call refreshes
            self.auth.invalidate();
        }
        result
    }

    /// Handles API response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(AdSenseError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdSenseError::api(status.as_u16(), text));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Lists the accounts the credentials can access.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let response: RawAccountsResponse = self.get("/accounts", &[]).await?;

        Ok(response
            .accounts
            .unwrap_or_default()
            .into_iter()
            .map(Account::from)
            .collect())
    }

    /// Lists the sites registered under `account`.
    ///
    /// # Errors
    /// Returns error if the account name is malformed or the API call fails.
    pub async fn list_sites(&self, account: &str) -> Result<Vec<Site>> {
        let account = Self::validate_account(account)?;
        let response: RawSitesResponse = self.get(&format!("/{account}/sites"), &[]).await?;

        Ok(response
            .sites
            .unwrap_or_default()
            .into_iter()
            .map(Site::from)
            .collect())
    }

    /// Generates a report over a custom date range.
    ///
    /// # Errors
    /// Returns error if the request is invalid or the API call fails.
    pub async fn generate_report(&self, account: &str, request: &ReportRequest) -> Result<Report> {
        let account = Self::validate_account(account)?;
        let query = Self::report_query(request)?;

        let response: RawReport = self
            .get(&format!("/{account}/reports:generate"), &query)
            .await?;
        let report = Report::from(response);

        tracing::debug!(
            account,
            rows = report.rows.len(),
            matched = report.total_matched_rows,
            "Generated AdSense report"
        );
        Ok(report)
    }

    /// Builds the repeated query parameters for `reports:generate`.
    fn report_query(request: &ReportRequest) -> Result<Vec<(&'static str, String)>> {
        if request.end_date < request.start_date {
            return Err(AdSenseError::InvalidRequest(format!(
                "end date {} is before start date {}",
                request.end_date, request.start_date
            )));
        }
        if request.metrics.is_empty() {
            return Err(AdSenseError::InvalidRequest("at least one metric is required".to_string()));
        }

        let mut query = vec![("dateRange", "CUSTOM".to_string())];
        push_date(&mut query, ["startDate.year", "startDate.month", "startDate.day"], request.start_date);
        push_date(&mut query, ["endDate.year", "endDate.month", "endDate.day"], request.end_date);
        query.extend(request.metrics.iter().map(|m| ("metrics", m.as_str().to_string())));
        query.extend(request.dimensions.iter().map(|d| ("dimensions", d.as_str().to_string())));
        query.extend(request.filters.iter().map(|f| ("filters", f.clone())));
        if let Some(code) = &request.currency_code {
            query.push(("currencyCode", code.clone()));
        }
        Ok(query)
    }

    /// Account used for reports: the configured one, else the first listed.
    ///
    /// # Errors
    /// Returns error if no account is configured and none are accessible.
    pub async fn default_account(&self) -> Result<String> {
        if let Some(account) = &self.config.account {
            return Ok(account.clone());
        }
        self.list_accounts()
            .await?
            .into_iter()
            .next()
            .map(|a| a.name)
            .ok_or_else(|| AdSenseError::Configuration("no AdSense accounts accessible".to_string()))
    }

    /// Fetches daily earnings for one domain.
    ///
    /// # Errors
    /// Returns error if the account lookup or report fails.
    pub async fn daily_earnings(
        &self,
        domain: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RevenueDataPoint>> {
        let account = self.default_account().await?;
        let request = ReportRequest::daily_earnings(start, end).for_domain(domain);
        let report = self.generate_report(&account, &request).await?;
        Ok(report.to_daily_points(domain))
    }
}

fn push_date(query: &mut Vec<(&'static str, String)>, keys: [&'static str; 3], date: NaiveDate) {
    query.push((keys[0], date.year().to_string()));
    query.push((keys[1], date.month().to_string()));
    query.push((keys[2], date.day().to_string()));
}

#[async_trait]
impl RevenueSource for AdSenseClient {
    fn name(&self) -> &str {
        "adsense"
    }

    async fn fetch_daily(
        &self,
        domain: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<RevenueDataPoint>> {
        Ok(self.daily_earnings(domain, start, end).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "expires_in": 3600
            })))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> AdSenseClient {
        let config = AdSenseClientConfig::default()
            .with_api_url(server.uri())
            .with_token_url(format!("{}/token", server.uri()));
        AdSenseClient::with_credentials(config, AdSenseCredentials::new("id", "secret", "refresh"))
            .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_client_config_default() {
        let config = AdSenseClientConfig::default();
        assert_eq!(config.api_url, ADSENSE_API_URL);
        assert_eq!(config.token_url, GOOGLE_TOKEN_URL);
        assert_eq!(config.requests_per_minute.get(), 60);
        assert!(config.account.is_none());
    }

    #[test]
    fn test_client_config_from_app_config() {
        let app = ifrit_core::AdSenseConfig {
            requests_per_minute: 0,
            timeout_secs: 5,
            ..ifrit_core::AppConfig::default().adsense
        };
        let config = AdSenseClientConfig::from(&app);
        assert_eq!(config.requests_per_minute.get(), 60);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_client_config_builder() {
        let config = AdSenseClientConfig::default()
            .with_api_url("http://localhost:1234")
            .with_rate_limit(nonzero!(120u32))
            .with_account("accounts/pub-1");
        assert_eq!(config.api_url, "http://localhost:1234");
        assert_eq!(config.requests_per_minute.get(), 120);
        assert_eq!(config.account.as_deref(), Some("accounts/pub-1"));
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_account() {
        assert!(AdSenseClient::validate_account("accounts/pub-1234567890").is_ok());
        assert!(AdSenseClient::validate_account("pub-1234567890").is_err());
        assert!(AdSenseClient::validate_account("accounts/../secrets").is_err());
        assert!(AdSenseClient::validate_account("accounts/").is_err());
        assert!(AdSenseClient::validate_account("accounts/pub 1").is_err());
    }

    #[test]
    fn test_report_query_repeats_params() {
        let request = ReportRequest::daily_earnings(date(1), date(30)).for_domain("a.com");
        let query = AdSenseClient::report_query(&request).unwrap();

        assert!(query.contains(&("dateRange", "CUSTOM".to_string())));
        assert!(query.contains(&("startDate.day", "1".to_string())));
        assert!(query.contains(&("endDate.month", "4".to_string())));
        assert_eq!(query.iter().filter(|(k, _)| *k == "metrics").count(), 4);
        assert!(query.contains(&("filters", "DOMAIN_NAME==a.com".to_string())));
    }

    #[test]
    fn test_report_query_rejects_inverted_range() {
        let request = ReportRequest::daily_earnings(date(10), date(1));
        assert!(matches!(
            AdSenseClient::report_query(&request),
            Err(AdSenseError::InvalidRequest(_))
        ));
    }

    // ==================== Raw Conversion Tests ====================

    #[test]
    fn test_raw_account_conversion() {
        let raw: RawAccount = serde_json::from_value(serde_json::json!({
            "name": "accounts/pub-42",
            "displayName": "Ifrit Media",
            "timeZone": { "id": "America/New_York" },
            "state": "READY"
        }))
        .unwrap();

        let account = Account::from(raw);
        assert_eq!(account.display_name, "Ifrit Media");
        assert_eq!(account.time_zone.as_deref(), Some("America/New_York"));
    }

    #[test]
    fn test_raw_report_conversion() {
        let raw: RawReport = serde_json::from_value(serde_json::json!({
            "totalMatchedRows": "1",
            "headers": [
                { "name": "DATE", "type": "DIMENSION" },
                { "name": "ESTIMATED_EARNINGS", "type": "METRIC_CURRENCY", "currencyCode": "USD" }
            ],
            "rows": [ { "cells": [ { "value": "2026-04-01" }, { "value": "1.23" } ] } ]
        }))
        .unwrap();

        let report = Report::from(raw);
        assert_eq!(report.total_matched_rows, 1);
        assert_eq!(report.headers[1].header_type, HeaderType::MetricCurrency);
        assert_eq!(report.money_cents(&report.rows[0], Metric::EstimatedEarnings), Some(123));
    }

    // ==================== Mock Server Tests ====================

    #[tokio::test]
    async fn test_list_accounts() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accounts": [
                    { "name": "accounts/pub-1", "displayName": "One" },
                    { "name": "accounts/pub-2" }
                ]
            })))
            .mount(&server)
            .await;

        let accounts = client_for(&server).list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].display_name, "accounts/pub-2");
    }

    #[tokio::test]
    async fn test_list_sites() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/accounts/pub-1/sites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sites": [ { "name": "accounts/pub-1/sites/blog.example.com", "domain": "blog.example.com", "state": "READY", "autoAdsEnabled": true } ]
            })))
            .mount(&server)
            .await;

        let sites = client_for(&server).list_sites("accounts/pub-1").await.unwrap();
        assert_eq!(sites[0].domain, "blog.example.com");
        assert!(sites[0].auto_ads_enabled);
    }

    #[tokio::test]
    async fn test_generate_report_sends_custom_range() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/accounts/pub-1/reports:generate"))
            .and(query_param("dateRange", "CUSTOM"))
            .and(query_param("startDate.year", "2026"))
            .and(query_param("dimensions", "DATE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalMatchedRows": "1",
                "headers": [
                    { "name": "DATE", "type": "DIMENSION" },
                    { "name": "PAGE_VIEWS", "type": "METRIC_TALLY" },
                    { "name": "ESTIMATED_EARNINGS", "type": "METRIC_CURRENCY" }
                ],
                "rows": [ { "cells": [ { "value": "2026-04-01" }, { "value": "500" }, { "value": "2.00" } ] } ]
            })))
            .mount(&server)
            .await;

        let request = ReportRequest::daily_earnings(date(1), date(2));
        let report = client_for(&server)
            .generate_report("accounts/pub-1", &request)
            .await
            .unwrap();
        let points = report.to_daily_points("any.com");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].revenue, 200);
        assert_eq!(points[0].page_views, 500);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_retry_after() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_accounts().await.unwrap_err();
        assert!(matches!(err, AdSenseError::RateLimit { retry_after_secs: 17 }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_accounts().await.unwrap_err();
        assert!(matches!(err, AdSenseError::Api { status_code: 503, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_rejected_token_is_refreshed_on_next_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "expires_in": 3600
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_accounts().await.unwrap_err();
        assert!(err.is_auth_failure());
        assert!(client.list_accounts().await.is_err());

        server.verify().await;
    }

    #[tokio::test]
    async fn test_revenue_source_uses_first_account() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accounts": [ { "name": "accounts/pub-9" } ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts/pub-9/reports:generate"))
            .and(query_param("filters", "DOMAIN_NAME==news.example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "headers": [
                    { "name": "DATE", "type": "DIMENSION" },
                    { "name": "ESTIMATED_EARNINGS", "type": "METRIC_MICROS" }
                ],
                "rows": [
                    { "cells": [ { "value": "2026-04-01" }, { "value": "2500000" } ] },
                    { "cells": [ { "value": "2026-04-02" }, { "value": "1000000" } ] }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let points = client
            .fetch_daily("news.example.com", date(1), date(2))
            .await
            .unwrap();
        assert_eq!(client.name(), "adsense");
        assert_eq!(points.iter().map(|p| p.revenue).sum::<i64>(), 350);
    }
}
