//! Data model for revenue tracking.
//!
//! Money is integer cents (`i64`). Derived ratios (RPM, CTR, CPC) are
//! `rust_decimal::Decimal` rounded to 2 places.

use chrono::{DateTime, NaiveDate, Utc};
use ifrit_core::{round_ratio, safe_div};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Derived Metrics
// =============================================================================

/// Revenue per 1000 page views, in cents.
#[must_use]
pub fn rpm(revenue_cents: i64, page_views: u64) -> Decimal {
    round_ratio(safe_div(
        Decimal::from(revenue_cents) * Decimal::ONE_THOUSAND,
        Decimal::from(page_views),
    ))
}

/// Click-through rate in percent.
#[must_use]
pub fn ctr(clicks: u64, impressions: u64) -> Decimal {
    round_ratio(safe_div(
        Decimal::from(clicks) * Decimal::ONE_HUNDRED,
        Decimal::from(impressions),
    ))
}

/// Revenue per click, in cents.
#[must_use]
pub fn cpc(revenue_cents: i64, clicks: u64) -> Decimal {
    round_ratio(safe_div(Decimal::from(revenue_cents), Decimal::from(clicks)))
}

// =============================================================================
// Daily Metrics
// =============================================================================

/// One day of metrics for a site.
///
/// Derived fields are optional on input and always recomputed from the raw
/// counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueDataPoint {
    pub date: NaiveDate,
    pub page_views: u64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    /// Revenue in cents.
    pub revenue: i64,
    #[serde(default)]
    pub rpm: Decimal,
    #[serde(default)]
    pub ctr: Decimal,
    #[serde(default)]
    pub cpc: Decimal,
}

impl RevenueDataPoint {
    /// Creates a data point and computes its derived metrics.
    #[must_use]
    pub fn new(date: NaiveDate, page_views: u64, impressions: u64, clicks: u64, revenue: i64) -> Self {
        let mut point = Self {
            date,
            page_views,
            impressions,
            clicks,
            revenue,
            rpm: Decimal::ZERO,
            ctr: Decimal::ZERO,
            cpc: Decimal::ZERO,
        };
        point.recompute();
        point
    }

    /// Recomputes RPM, CTR and CPC from the raw counters.
    pub fn recompute(&mut self) {
        self.rpm = rpm(self.revenue, self.page_views);
        self.ctr = ctr(self.clicks, self.impressions);
        self.cpc = cpc(self.revenue, self.clicks);
    }
}

/// Revenue totals for a canned period (today, last 7 days, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRevenue {
    pub revenue: i64,
    pub page_views: u64,
    pub rpm: Decimal,
}

impl PeriodRevenue {
    /// Sums a slice of data points into a period bucket.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a RevenueDataPoint>) -> Self {
        let (revenue, page_views) = points
            .into_iter()
            .fold((0i64, 0u64), |(rev, pv), p| {
                (rev.saturating_add(p.revenue), pv.saturating_add(p.page_views))
            });
        Self {
            revenue,
            page_views,
            rpm: rpm(revenue, page_views),
        }
    }
}

/// Direction of a site's revenue over the last two weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

// =============================================================================
// Events
// =============================================================================

/// Ad network or channel that produced the revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdNetwork {
    #[default]
    Adsense,
    Ezoic,
    Mediavine,
    Affiliate,
    Sponsored,
    Other,
}

/// A revenue event as submitted by a caller; id and timestamp are assigned on record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRevenueEvent {
    pub site_id: String,
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub page_views: u64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    /// Revenue in cents.
    pub revenue: i64,
    #[serde(default)]
    pub source: AdNetwork,
    #[serde(default)]
    pub ad_format: Option<String>,
}

impl NewRevenueEvent {
    /// Starts an event for a site with the given revenue in cents.
    #[must_use]
    pub fn new(site_id: impl Into<String>, revenue: i64) -> Self {
        Self {
            site_id: site_id.into(),
            revenue,
            ..Default::default()
        }
    }

    /// Attributes the event to a piece of content.
    #[must_use]
    pub fn with_content(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Attributes the event to a campaign.
    #[must_use]
    pub fn with_campaign(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    /// Attributes the event to an author.
    #[must_use]
    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Sets the raw counters.
    #[must_use]
    pub fn with_counts(mut self, page_views: u64, impressions: u64, clicks: u64) -> Self {
        self.page_views = page_views;
        self.impressions = impressions;
        self.clicks = clicks;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: AdNetwork) -> Self {
        self.source = source;
        self
    }
}

/// A recorded revenue event. The event log is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub site_id: String,
    pub content_id: Option<String>,
    pub campaign_id: Option<String>,
    pub author_id: Option<String>,
    pub page_views: u64,
    pub impressions: u64,
    pub clicks: u64,
    /// Revenue in cents.
    pub revenue: i64,
    pub source: AdNetwork,
    pub ad_format: Option<String>,
}

impl RevenueEvent {
    /// Stamps a submitted event with an id and timestamp.
    #[must_use]
    pub fn from_new(event: NewRevenueEvent, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            site_id: event.site_id,
            content_id: event.content_id,
            campaign_id: event.campaign_id,
            author_id: event.author_id,
            page_views: event.page_views,
            impressions: event.impressions,
            clicks: event.clicks,
            revenue: event.revenue,
            source: event.source,
            ad_format: event.ad_format,
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Cumulative revenue for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRevenue {
    pub content_id: String,
    /// Site of the first event that referenced this content.
    pub site_id: String,
    pub campaign_id: Option<String>,
    pub author_id: Option<String>,
    pub page_views: u64,
    pub impressions: u64,
    pub clicks: u64,
    /// Revenue in cents.
    pub revenue: i64,
    pub rpm: Decimal,
    pub first_revenue_at: DateTime<Utc>,
    pub last_revenue_at: DateTime<Utc>,
}

/// Compact view of a content entry inside [`SiteRevenue::top_content`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopContent {
    pub content_id: String,
    pub revenue: i64,
    pub page_views: u64,
    pub rpm: Decimal,
}

impl From<&ContentRevenue> for TopContent {
    fn from(content: &ContentRevenue) -> Self {
        Self {
            content_id: content.content_id.clone(),
            revenue: content.revenue,
            page_views: content.page_views,
            rpm: content.rpm,
        }
    }
}

/// Cumulative revenue for one site.
///
/// Totals are written by both recorded events and imports. Period buckets,
/// `daily` and `trend` are written by imports only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRevenue {
    pub site_id: String,
    pub domain: String,
    /// Revenue in cents.
    pub total_revenue: i64,
    pub total_page_views: u64,
    pub avg_rpm: Decimal,
    pub today: PeriodRevenue,
    pub yesterday: PeriodRevenue,
    pub last_7_days: PeriodRevenue,
    pub last_30_days: PeriodRevenue,
    pub this_month: PeriodRevenue,
    pub last_month: PeriodRevenue,
    pub top_content: Vec<TopContent>,
    pub trend: Trend,
    pub daily: Vec<RevenueDataPoint>,
    pub last_updated: DateTime<Utc>,
}

impl SiteRevenue {
    /// Creates an empty rollup for a site.
    #[must_use]
    pub fn new(site_id: impl Into<String>, domain: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            site_id: site_id.into(),
            domain: domain.into(),
            total_revenue: 0,
            total_page_views: 0,
            avg_rpm: Decimal::ZERO,
            today: PeriodRevenue::default(),
            yesterday: PeriodRevenue::default(),
            last_7_days: PeriodRevenue::default(),
            last_30_days: PeriodRevenue::default(),
            this_month: PeriodRevenue::default(),
            last_month: PeriodRevenue::default(),
            top_content: Vec::new(),
            trend: Trend::Stable,
            daily: Vec::new(),
            last_updated: now,
        }
    }
}

/// Revenue rolled up across a campaign's or author's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueRollup {
    pub total_revenue: i64,
    pub total_page_views: u64,
    pub avg_rpm: Decimal,
    pub content_count: usize,
    pub content: Vec<ContentRevenue>,
}

/// Metric used to rank content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSort {
    #[default]
    Revenue,
    PageViews,
    Rpm,
}

/// State of the last external revenue sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error { message: String },
}

/// Totals across everything the tracker knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: i64,
    pub total_page_views: u64,
    pub avg_rpm: Decimal,
    pub site_count: usize,
    pub content_count: usize,
    pub event_count: usize,
    pub sync_status: SyncStatus,
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// A bulk import of daily history for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueImport {
    pub site_id: String,
    pub domain: String,
    pub data_points: Vec<RevenueDataPoint>,
}
