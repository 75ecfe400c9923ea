//! AdSense connection check and revenue sync commands.

#![allow(clippy::format_push_string)]

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use clap::Args;
use ifrit_adsense::{AdSenseClient, AdSenseClientConfig, AdSenseService, ConnectionStatus};
use ifrit_core::AppConfig;
use ifrit_monetization::{sync_site, RevenueFormatter, RevenueTracker};
use parking_lot::RwLock;

/// Arguments for the sync-adsense command.
#[derive(Args, Debug, Clone)]
pub struct SyncAdsenseArgs {
    /// Tracker site id to import into
    #[arg(long)]
    pub site_id: String,

    /// Domain to filter the AdSense report by (e.g., "cooking.example.com")
    #[arg(long)]
    pub domain: String,

    /// Days of history ending today (defaults to monetization.sync_lookback_days)
    #[arg(long)]
    pub days: Option<u32>,
}

/// Inclusive date window of `days` days ending on `end`.
pub fn sync_window(end: NaiveDate, days: u32) -> Result<(NaiveDate, NaiveDate)> {
    let days = days.max(1);
    let start = end
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .context("sync window starts before the supported date range")?;
    Ok((start, end))
}

#[must_use]
pub fn format_connection_status(status: &ConnectionStatus) -> String {
    let mut output = String::new();
    output.push_str("\nAdSense connection\n");
    output.push_str("──────────────────\n");
    if status.connected {
        output.push_str("Status:    connected\n");
        output.push_str(&format!("Accounts:  {}\n", status.account_count));
        for account in &status.accounts {
            output.push_str(&format!("  • {account}\n"));
        }
    } else {
        output.push_str("Status:    disconnected\n");
        if let Some(error) = &status.error {
            output.push_str(&format!("Error:     {error}\n"));
        }
    }
    output
}

/// Every synced site report followed by the tracker summary, or `None` when
/// nothing was imported.
#[must_use]
pub fn format_sync_report(tracker: &RevenueTracker) -> Option<String> {
    let mut sites: Vec<_> = tracker.sites().collect();
    if sites.is_empty() {
        return None;
    }
    sites.sort_by(|a, b| a.site_id.cmp(&b.site_id));

    let mut output = String::new();
    for site in sites {
        output.push_str(&RevenueFormatter::format_site(site));
        output.push('\n');
    }
    output.push_str(&RevenueFormatter::format_summary(&tracker.total_summary()));
    Some(output)
}

/// Runs the adsense-status command.
///
/// # Errors
/// Never fails; a broken connection is reported, not returned.
pub async fn run_adsense_status(config: &AppConfig) -> Result<()> {
    let service = AdSenseService::from_config(AdSenseClientConfig::from(&config.adsense));
    let status = service.connection_status().await;
    println!("{}", format_connection_status(&status));
    Ok(())
}

/// Runs the sync-adsense command: pulls daily earnings for one domain and
/// prints the resulting site rollup and summary.
///
/// # Errors
/// Returns an error if credentials are missing or the AdSense sync fails.
pub async fn run_sync_adsense(args: SyncAdsenseArgs, config: &AppConfig) -> Result<()> {
    let client = AdSenseClient::new(AdSenseClientConfig::from(&config.adsense))
        .context("failed to set up AdSense client")?;

    let days = args.days.unwrap_or(config.monetization.sync_lookback_days);
    let (start, end) = sync_window(Utc::now().date_naive(), days)?;

    tracing::info!(site_id = %args.site_id, domain = %args.domain, %start, %end, "Syncing AdSense earnings");

    let tracker = RwLock::new(RevenueTracker::new());
    let imported = sync_site(&tracker, &client, &args.site_id, &args.domain, start, end)
        .await
        .with_context(|| format!("AdSense sync failed for {}", args.domain))?;

    match format_sync_report(&tracker.read()) {
        Some(report) => println!("{report}"),
        None => println!("No AdSense data for {} between {start} and {end}", args.domain),
    }
    tracing::info!(imported, "AdSense sync complete");
    Ok(())
}
