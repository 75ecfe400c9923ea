use crate::tracker::RevenueTracker;
use crate::types::{RevenueDataPoint, RevenueImport, SyncStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

/// An external system that reports daily revenue for a site.
#[async_trait]
pub trait RevenueSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches one data point per day in `start..=end` for `domain`.
    async fn fetch_daily(
        &self,
        domain: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RevenueDataPoint>>;
}

/// Pulls daily history from `source` and imports it into the tracker.
///
/// The sync status moves to `syncing`, then `success` or `error`. The lock is
/// only taken for the synchronous status and import steps.
///
/// # Errors
///
/// Returns the fetch error after recording it as the sync status.
pub async fn sync_site(
    tracker: &RwLock<RevenueTracker>,
    source: &dyn RevenueSource,
    site_id: &str,
    domain: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<usize> {
    tracker.write().set_sync_status(SyncStatus::Syncing);
    tracing::info!(source = source.name(), site_id, %start, %end, "Syncing revenue");

    let points = match source.fetch_daily(domain, start, end).await {
        Ok(points) => points,
        Err(e) => {
            tracing::warn!(source = source.name(), site_id, "Revenue sync failed: {e:#}");
            tracker.write().set_sync_status(SyncStatus::Error {
                message: format!("{e:#}"),
            });
            return Err(e);
        }
    };

    let count = points.len();
    {
        let mut guard = tracker.write();
        guard.import_revenue_data(RevenueImport {
            site_id: site_id.to_string(),
            domain: domain.to_string(),
            data_points: points,
        });
        guard.set_sync_status(SyncStatus::Success);
    }

    tracing::info!(source = source.name(), site_id, points = count, "Revenue sync complete");
    Ok(count)
}
