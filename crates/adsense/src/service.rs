//! Best-effort AdSense facade for the dashboard.
//!
//! Nothing here returns an error: failures are logged and surfaced as a
//! disconnected status or an absent report, so a broken AdSense link never
//! takes the dashboard down with it.

use crate::client::{AdSenseClient, AdSenseClientConfig};
use crate::types::{Metric, ReportRequest, Site};
use chrono::NaiveDate;
use ifrit_monetization::RevenueDataPoint;
use serde::{Deserialize, Serialize};

/// Whether the AdSense link works right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub account_count: usize,
    pub accounts: Vec<String>,
    pub error: Option<String>,
}

impl ConnectionStatus {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Earnings for one account over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub account: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total estimated earnings in cents.
    pub total_earnings: i64,
    pub page_views: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub daily: Vec<RevenueDataPoint>,
}

pub struct AdSenseService {
    client: Option<AdSenseClient>,
    setup_error: Option<String>,
}

impl AdSenseService {
    pub fn new(client: AdSenseClient) -> Self {
        Self {
            client: Some(client),
            setup_error: None,
        }
    }

    /// Builds the client from the environment; missing credentials leave the
    /// service in a permanently disconnected state instead of failing.
    pub fn from_config(config: AdSenseClientConfig) -> Self {
        match AdSenseClient::new(config) {
            Ok(client) => Self::new(client),
            Err(e) => {
                tracing::warn!("AdSense client unavailable: {e}");
                Self {
                    client: None,
                    setup_error: Some(e.to_string()),
                }
            }
        }
    }

    #[must_use]
    pub fn client(&self) -> Option<&AdSenseClient> {
        self.client.as_ref()
    }

    fn unavailable(&self) -> String {
        self.setup_error
            .clone()
            .unwrap_or_else(|| "AdSense client not configured".to_string())
    }

    /// Checks the connection by listing accounts.
    pub async fn connection_status(&self) -> ConnectionStatus {
        let Some(client) = &self.client else {
            return ConnectionStatus::failed(self.unavailable());
        };

        match client.list_accounts().await {
            Ok(accounts) => ConnectionStatus {
                connected: true,
                account_count: accounts.len(),
                accounts: accounts.into_iter().map(|a| a.name).collect(),
                error: None,
            },
            Err(e) => {
                tracing::warn!(retry_after_secs = ?e.retry_delay_secs(), "AdSense connection check failed: {e}");
                ConnectionStatus::failed(e.to_string())
            }
        }
    }

    /// Sites for an account, or empty on failure.
    pub async fn sites(&self, account: &str) -> Vec<Site> {
        let Some(client) = &self.client else {
            return Vec::new();
        };
        client.list_sites(account).await.unwrap_or_else(|e| {
            tracing::warn!(account, retry_after_secs = ?e.retry_delay_secs(), "AdSense site listing failed: {e}");
            Vec::new()
        })
    }

    /// Earnings over `start..=end`, optionally for one domain. Uses the
    /// configured or first account when `account` is `None`.
    pub async fn earnings_report(
        &self,
        account: Option<&str>,
        domain: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<EarningsSummary> {
        let client = self.client.as_ref()?;

        let account = match account {
            Some(a) => a.to_string(),
            None => match client.default_account().await {
                Ok(a) => a,
                Err(e) => {
                    tracing::warn!(retry_after_secs = ?e.retry_delay_secs(), "AdSense account lookup failed: {e}");
                    return None;
                }
            },
        };

        let mut request = ReportRequest::daily_earnings(start, end);
        if let Some(domain) = domain {
            request = request.for_domain(domain);
        }

        let report = match client.generate_report(&account, &request).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    %account,
                    retry_after_secs = ?e.retry_delay_secs(),
                    "AdSense earnings report failed: {e}"
                );
                return None;
            }
        };

        let daily = report.to_daily_points(domain.unwrap_or_default());
        let total_earnings = report
            .total_earnings_cents()
            .unwrap_or_else(|| daily.iter().map(|p| p.revenue).sum());
        let totals = report.totals.as_ref();

        Some(EarningsSummary {
            start_date: start,
            end_date: end,
            total_earnings,
            page_views: totals.map_or_else(
                || daily.iter().map(|p| p.page_views).sum(),
                |row| report.tally(row, Metric::PageViews),
            ),
            impressions: totals.map_or_else(
                || daily.iter().map(|p| p.impressions).sum(),
                |row| report.tally(row, Metric::Impressions),
            ),
            clicks: totals.map_or_else(
                || daily.iter().map(|p| p.clicks).sum(),
                |row| report.tally(row, Metric::Clicks),
            ),
            account,
            daily,
        })
    }
}
