//! In-memory revenue aggregation.
//!
//! [`RevenueTracker`] keeps an append-only event log and rolls each event into
//! per-site and per-content aggregates as it arrives. Site period buckets and
//! trend come from [`RevenueTracker::import_revenue_data`] only; events add to
//! the site totals on top of whatever the last import left there.

use crate::types::{
    rpm, ContentRevenue, ContentSort, NewRevenueEvent, PeriodRevenue, RevenueDataPoint,
    RevenueEvent, RevenueImport, RevenueRollup, RevenueSummary, SiteRevenue, SyncStatus,
    TopContent, Trend,
};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of content entries kept in [`SiteRevenue::top_content`].
pub const SITE_TOP_CONTENT_LIMIT: usize = 5;

/// Minimum number of daily points needed to classify a trend.
pub const TREND_MIN_POINTS: usize = 14;

const TREND_WINDOW: usize = 7;
const TREND_THRESHOLD: Decimal = dec!(0.05);

#[derive(Debug, Default)]
pub struct RevenueTracker {
    sites: HashMap<String, SiteRevenue>,
    content: HashMap<String, ContentRevenue>,
    events: Vec<RevenueEvent>,
    sync_status: SyncStatus,
    last_sync_at: Option<DateTime<Utc>>,
}

impl RevenueTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Records a revenue event stamped with the current time.
    pub fn record_event(&mut self, event: NewRevenueEvent) -> RevenueEvent {
        self.record_event_at(event, Utc::now())
    }

    /// Records a revenue event with an explicit timestamp.
    ///
    /// The event is not validated: negative revenue is summed like any other
    /// amount.
    pub fn record_event_at(&mut self, event: NewRevenueEvent, timestamp: DateTime<Utc>) -> RevenueEvent {
        let event = RevenueEvent::from_new(event, timestamp);

        tracing::debug!(
            event_id = %event.id,
            site_id = %event.site_id,
            content_id = ?event.content_id,
            revenue = event.revenue,
            "Recording revenue event"
        );

        let site = self
            .sites
            .entry(event.site_id.clone())
            .or_insert_with(|| SiteRevenue::new(event.site_id.clone(), event.site_id.clone(), timestamp));
        // Totals saturate at the integer bounds
        site.total_revenue = site.total_revenue.saturating_add(event.revenue);
        site.total_page_views = site.total_page_views.saturating_add(event.page_views);
        site.avg_rpm = rpm(site.total_revenue, site.total_page_views);
        site.last_updated = timestamp;

        if let Some(content_id) = &event.content_id {
            let content = self
                .content
                .entry(content_id.clone())
                .or_insert_with(|| ContentRevenue {
                    content_id: content_id.clone(),
                    site_id: event.site_id.clone(),
                    campaign_id: None,
                    author_id: None,
                    page_views: 0,
                    impressions: 0,
                    clicks: 0,
                    revenue: 0,
                    rpm: Decimal::ZERO,
                    first_revenue_at: timestamp,
                    last_revenue_at: timestamp,
                });
            if content.campaign_id.is_none() {
                content.campaign_id.clone_from(&event.campaign_id);
            }
            if content.author_id.is_none() {
                content.author_id.clone_from(&event.author_id);
            }
            content.page_views = content.page_views.saturating_add(event.page_views);
            content.impressions = content.impressions.saturating_add(event.impressions);
            content.clicks = content.clicks.saturating_add(event.clicks);
            content.revenue = content.revenue.saturating_add(event.revenue);
            content.rpm = rpm(content.revenue, content.page_views);
            content.last_revenue_at = timestamp;

            let site_id = content.site_id.clone();
            self.refresh_site_top_content(&site_id);
        }

        self.events.push(event.clone());
        event
    }

    fn refresh_site_top_content(&mut self, site_id: &str) {
        let mut entries: Vec<&ContentRevenue> =
            self.content.values().filter(|c| c.site_id == site_id).collect();
        entries.sort_by(|a, b| compare_desc(a, b, ContentSort::Revenue));
        let top: Vec<TopContent> = entries
            .into_iter()
            .take(SITE_TOP_CONTENT_LIMIT)
            .map(TopContent::from)
            .collect();

        if let Some(site) = self.sites.get_mut(site_id) {
            site.top_content = top;
        }
    }

    /// Records the state of the last external sync. `Success` also stamps
    /// `last_sync_at`.
    pub fn set_sync_status(&mut self, status: SyncStatus) {
        self.set_sync_status_at(status, Utc::now());
    }

    pub fn set_sync_status_at(&mut self, status: SyncStatus, now: DateTime<Utc>) {
        if status == SyncStatus::Success {
            self.last_sync_at = Some(now);
        }
        self.sync_status = status;
    }

    /// Replaces a site's daily history, totals, period buckets and trend
    /// from a bulk import.
    pub fn import_revenue_data(&mut self, import: RevenueImport) -> &SiteRevenue {
        self.import_revenue_data_at(import, Utc::now())
    }

    pub fn import_revenue_data_at(&mut self, import: RevenueImport, now: DateTime<Utc>) -> &SiteRevenue {
        let RevenueImport {
            site_id,
            domain,
            mut data_points,
        } = import;

        for point in &mut data_points {
            point.recompute();
        }
        data_points.sort_by_key(|p| p.date);

        let site = self
            .sites
            .entry(site_id.clone())
            .or_insert_with(|| SiteRevenue::new(site_id.clone(), domain.clone(), now));

        site.domain = domain;
        let totals = PeriodRevenue::from_points(&data_points);
        site.total_revenue = totals.revenue;
        site.total_page_views = totals.page_views;
        site.avg_rpm = totals.rpm;
        fill_period_buckets(site, &data_points);
        if let Some(trend) = classify_trend(&data_points) {
            site.trend = trend;
        }
        site.last_updated = now;

        tracing::info!(
            site_id = %site.site_id,
            points = data_points.len(),
            total_revenue = site.total_revenue,
            trend = ?site.trend,
            "Imported revenue data"
        );

        site.daily = data_points;
        site
    }

    /// Clears every aggregate, the event log and the sync state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[must_use]
    pub fn site_revenue(&self, site_id: &str) -> Option<&SiteRevenue> {
        self.sites.get(site_id)
    }

    #[must_use]
    pub fn content_revenue(&self, content_id: &str) -> Option<&ContentRevenue> {
        self.content.get(content_id)
    }

    #[must_use]
    pub fn campaign_revenue(&self, campaign_id: &str) -> RevenueRollup {
        self.rollup(|c| c.campaign_id.as_deref() == Some(campaign_id))
    }

    #[must_use]
    pub fn author_revenue(&self, author_id: &str) -> RevenueRollup {
        self.rollup(|c| c.author_id.as_deref() == Some(author_id))
    }

    fn rollup(&self, matches: impl Fn(&ContentRevenue) -> bool) -> RevenueRollup {
        let mut content: Vec<ContentRevenue> =
            self.content.values().filter(|c| matches(c)).cloned().collect();
        content.sort_by(|a, b| compare_desc(a, b, ContentSort::Revenue));

        let total_revenue = content.iter().fold(0i64, |acc, c| acc.saturating_add(c.revenue));
        let total_page_views = content.iter().fold(0u64, |acc, c| acc.saturating_add(c.page_views));

        RevenueRollup {
            total_revenue,
            total_page_views,
            avg_rpm: rpm(total_revenue, total_page_views),
            content_count: content.len(),
            content,
        }
    }

    /// Returns up to `limit` content entries, highest `sort_by` first.
    #[must_use]
    pub fn top_content(&self, limit: usize, sort_by: ContentSort) -> Vec<&ContentRevenue> {
        let mut content: Vec<&ContentRevenue> = self.content.values().collect();
        content.sort_by(|a, b| compare_desc(a, b, sort_by));
        content.truncate(limit);
        content
    }

    #[must_use]
    pub fn total_summary(&self) -> RevenueSummary {
        let total_revenue = self
            .sites
            .values()
            .fold(0i64, |acc, s| acc.saturating_add(s.total_revenue));
        let total_page_views = self
            .sites
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(s.total_page_views));

        RevenueSummary {
            total_revenue,
            total_page_views,
            avg_rpm: rpm(total_revenue, total_page_views),
            site_count: self.sites.len(),
            content_count: self.content.len(),
            event_count: self.events.len(),
            sync_status: self.sync_status.clone(),
            last_sync_at: self.last_sync_at,
        }
    }

    #[must_use]
    pub fn sync_status(&self) -> &SyncStatus {
        &self.sync_status
    }

    /// Read-only view of the event log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RevenueEvent] {
        &self.events
    }

    pub fn sites(&self) -> impl Iterator<Item = &SiteRevenue> {
        self.sites.values()
    }
}

/// Orders content by `sort_by` descending, then by id for stable output.
fn compare_desc(a: &ContentRevenue, b: &ContentRevenue, sort_by: ContentSort) -> Ordering {
    let primary = match sort_by {
        ContentSort::Revenue => b.revenue.cmp(&a.revenue),
        ContentSort::PageViews => b.page_views.cmp(&a.page_views),
        ContentSort::Rpm => b.rpm.cmp(&a.rpm),
    };
    primary.then_with(|| a.content_id.cmp(&b.content_id))
}

/// Fills the period buckets from date-sorted points, relative to the latest
/// point rather than the wall clock.
fn fill_period_buckets(site: &mut SiteRevenue, points: &[RevenueDataPoint]) {
    let n = points.len();
    let last_n = |count: usize| PeriodRevenue::from_points(&points[n.saturating_sub(count)..]);

    site.today = points.last().map(|p| PeriodRevenue::from_points([p])).unwrap_or_default();
    site.yesterday = n
        .checked_sub(2)
        .map(|i| PeriodRevenue::from_points([&points[i]]))
        .unwrap_or_default();
    site.last_7_days = last_n(7);
    site.last_30_days = last_n(30);

    let Some(latest) = points.last().map(|p| p.date) else {
        site.this_month = PeriodRevenue::default();
        site.last_month = PeriodRevenue::default();
        return;
    };
    let this_month = month_start(latest);
    let last_month = this_month.checked_sub_months(Months::new(1));

    site.this_month = PeriodRevenue::from_points(points.iter().filter(|p| month_start(p.date) == this_month));
    site.last_month = PeriodRevenue::from_points(
        points
            .iter()
            .filter(|p| Some(month_start(p.date)) == last_month),
    );
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Compares the last 7 points against the 7 before them. Returns `None` when
/// there is not enough history.
fn classify_trend(points: &[RevenueDataPoint]) -> Option<Trend> {
    if points.len() < TREND_MIN_POINTS {
        return None;
    }
    let n = points.len();
    let sum = |slice: &[RevenueDataPoint]| PeriodRevenue::from_points(slice).revenue;
    let last = sum(&points[n - TREND_WINDOW..]);
    let previous = sum(&points[n - 2 * TREND_WINDOW..n - TREND_WINDOW]);

    if previous == 0 {
        return Some(if last > 0 { Trend::Up } else { Trend::Stable });
    }

    let change = (Decimal::from(last) - Decimal::from(previous)) / Decimal::from(previous).abs();
    Some(if change > TREND_THRESHOLD {
        Trend::Up
    } else if change < -TREND_THRESHOLD {
        Trend::Down
    } else {
        Trend::Stable
    })
}
