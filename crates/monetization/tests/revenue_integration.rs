use chrono::NaiveDate;
use ifrit_monetization::{
    estimate_monthly_revenue, predict_cpm, sync_site, ContentSort, CpmPredictionRequest,
    EstimateOptions, NewRevenueEvent, RevenueDataPoint, RevenueImport, RevenueSource,
    RevenueTracker, SyncStatus, TrafficSource, Trend,
};
use parking_lot::RwLock;
use std::sync::Arc;

struct StaticSource(Vec<RevenueDataPoint>);

#[async_trait::async_trait]
impl RevenueSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_daily(
        &self,
        _domain: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> anyhow::Result<Vec<RevenueDataPoint>> {
        Ok(self.0.clone())
    }
}

fn history(days: u32, daily_revenue: impl Fn(u32) -> i64) -> Vec<RevenueDataPoint> {
    (1..=days)
        .map(|d| {
            let date = NaiveDate::from_ymd_opt(2026, 5, d).unwrap();
            RevenueDataPoint::new(date, 2000, 4000, 40, daily_revenue(d))
        })
        .collect()
}

#[test]
fn test_prediction_feeds_estimate() {
    let options = EstimateOptions {
        traffic_source: Some(TrafficSource::Organic),
        month: Some(11),
        ..EstimateOptions::default()
    };
    let prediction = predict_cpm(&CpmPredictionRequest {
        niche: "finance".to_string(),
        topic: None,
        traffic_source: options.traffic_source,
        month: options.month,
        geo_target: None,
    });
    let estimate = estimate_monthly_revenue(50_000, "finance", &options);

    assert_eq!(estimate.cpm_used, prediction.estimated_cpm);
    assert_eq!(estimate.estimated_revenue, prediction.estimated_cpm * 50);
    assert_eq!(estimate.confidence, prediction.confidence);
}

#[test]
fn test_events_and_import_share_site_totals() {
    let mut tracker = RevenueTracker::new();

    tracker.import_revenue_data(RevenueImport {
        site_id: "site-1".to_string(),
        domain: "recipes.example.com".to_string(),
        data_points: history(30, |d| if d > 23 { 150 } else { 100 }),
    });
    tracker.record_event(
        NewRevenueEvent::new("site-1", 75)
            .with_content("sourdough")
            .with_author("kai")
            .with_counts(300, 600, 3),
    );

    let site = tracker.site_revenue("site-1").unwrap();
    assert_eq!(site.domain, "recipes.example.com");
    assert_eq!(site.total_revenue, 23 * 100 + 7 * 150 + 75);
    assert_eq!(site.trend, Trend::Up);
    assert_eq!(site.top_content.len(), 1);
    assert_eq!(site.last_30_days.revenue, 23 * 100 + 7 * 150);

    let top = tracker.top_content(5, ContentSort::Revenue);
    assert_eq!(top.len(), 1);
    assert_eq!(tracker.author_revenue("kai").total_revenue, 75);
}

#[tokio::test]
async fn test_shared_tracker_sync() {
    let tracker = Arc::new(RwLock::new(RevenueTracker::new()));
    let source = StaticSource(history(14, |d| if d > 7 { 80 } else { 100 }));
    let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 5, 14).unwrap();

    let imported = sync_site(&tracker, &source, "site-9", "news.example.com", start, end)
        .await
        .unwrap();
    assert_eq!(imported, 14);

    let guard = tracker.read();
    assert_eq!(guard.site_revenue("site-9").unwrap().trend, Trend::Down);
    let summary = guard.total_summary();
    assert_eq!(summary.sync_status, SyncStatus::Success);
    assert_eq!(summary.site_count, 1);
    assert_eq!(summary.event_count, 0);
}
