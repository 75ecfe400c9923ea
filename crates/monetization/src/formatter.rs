#![allow(clippy::format_push_string)]

use crate::cpm::{CpmPrediction, MonthlyRevenueEstimate};
use crate::niches::NicheCpmData;
use crate::types::{RevenueSummary, SiteRevenue, SyncStatus};
use ifrit_core::format_cents;

const BANNER: &str = "═══════════════════════════════════════════════════════════════\n";
const RULE: &str = "───────────────────────────────────────────────────────────────\n";

/// Plain-text reports for terminal output.
pub struct RevenueFormatter;

impl RevenueFormatter {
    fn header(output: &mut String, title: &str) {
        output.push('\n');
        output.push_str(BANNER);
        output.push_str(&format!("{title:^63}\n"));
        output.push_str(BANNER);
        output.push('\n');
    }

    fn section(output: &mut String, title: &str) {
        output.push_str(title);
        output.push('\n');
        output.push_str(RULE);
    }

    #[must_use]
    pub fn format_prediction(prediction: &CpmPrediction) -> String {
        let mut output = String::new();
        Self::header(&mut output, "CPM PREDICTION");

        output.push_str(&format!("Niche:                 {}\n", prediction.niche));
        output.push_str(&format!(
            "Estimated CPM:         {}\n",
            format_cents(prediction.estimated_cpm)
        ));
        output.push_str(&format!(
            "Range:                 {} - {}\n",
            format_cents(prediction.range.min),
            format_cents(prediction.range.max)
        ));
        output.push_str(&format!("Confidence:            {}%\n", prediction.confidence));
        output.push('\n');

        Self::section(&mut output, "Factors");
        for factor in &prediction.factors {
            output.push_str(&format!("  • {factor}\n"));
        }
        output.push_str(BANNER);
        output
    }

    #[must_use]
    pub fn format_estimate(estimate: &MonthlyRevenueEstimate) -> String {
        let mut output = String::new();
        Self::header(&mut output, "MONTHLY REVENUE ESTIMATE");

        output.push_str(&format!("Niche:                 {}\n", estimate.niche));
        output.push_str(&format!("Page Views:            {}\n", estimate.page_views));
        output.push_str(&format!("CPM Used:              {}\n", format_cents(estimate.cpm_used)));
        output.push_str(&format!(
            "Estimated Revenue:     {}\n",
            format_cents(estimate.estimated_revenue)
        ));
        output.push_str(&format!(
            "Range:                 {} - {}\n",
            format_cents(estimate.range.min),
            format_cents(estimate.range.max)
        ));
        output.push_str(&format!("Confidence:            {}%\n", estimate.confidence));
        output.push_str(BANNER);
        output
    }

    #[must_use]
    pub fn format_niches(niches: &[&NicheCpmData]) -> String {
        let mut output = String::new();
        Self::header(&mut output, "TOP NICHES BY CPM");

        output.push_str(&format!(
            "{:<4} {:<15} {:>10} {:>10} {:>10} {:>8}\n",
            "#", "Niche", "Avg", "Min", "Max", "Sample"
        ));
        output.push_str(RULE);
        for (rank, data) in niches.iter().enumerate() {
            output.push_str(&format!(
                "{:<4} {:<15} {:>10} {:>10} {:>10} {:>8}\n",
                rank + 1,
                data.niche.as_str(),
                format_cents(data.avg_cpm),
                format_cents(data.min_cpm),
                format_cents(data.max_cpm),
                data.sample_size
            ));
        }
        output.push_str(BANNER);
        output
    }

    #[must_use]
    pub fn format_summary(summary: &RevenueSummary) -> String {
        let mut output = String::new();
        Self::header(&mut output, "REVENUE SUMMARY");

        Self::section(&mut output, "Totals");
        output.push_str(&format!("Total Revenue:         {}\n", format_cents(summary.total_revenue)));
        output.push_str(&format!("Page Views:            {}\n", summary.total_page_views));
        output.push_str(&format!("Average RPM:           ${:.2}\n", summary.avg_rpm / rust_decimal::Decimal::ONE_HUNDRED));
        output.push('\n');

        Self::section(&mut output, "Tracking");
        output.push_str(&format!("Sites:                 {}\n", summary.site_count));
        output.push_str(&format!("Content:               {}\n", summary.content_count));
        output.push_str(&format!("Events:                {}\n", summary.event_count));
        output.push_str(&format!("Sync Status:           {}\n", sync_label(&summary.sync_status)));
        if let Some(at) = summary.last_sync_at {
            output.push_str(&format!("Last Sync:             {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        output.push_str(BANNER);
        output
    }

    #[must_use]
    pub fn format_site(site: &SiteRevenue) -> String {
        let mut output = String::new();
        Self::header(&mut output, &format!("SITE REVENUE: {}", site.domain));

        Self::section(&mut output, "Periods");
        let periods = [
            ("Today", &site.today),
            ("Yesterday", &site.yesterday),
            ("Last 7 Days", &site.last_7_days),
            ("Last 30 Days", &site.last_30_days),
            ("This Month", &site.this_month),
            ("Last Month", &site.last_month),
        ];
        for (label, period) in periods {
            output.push_str(&format!(
                "{:<22} {:>12} {:>10} views\n",
                format!("{label}:"),
                format_cents(period.revenue),
                period.page_views
            ));
        }
        output.push('\n');

        Self::section(&mut output, "Totals");
        output.push_str(&format!("Total Revenue:         {}\n", format_cents(site.total_revenue)));
        output.push_str(&format!("Page Views:            {}\n", site.total_page_views));
        output.push_str(&format!("Trend:                 {:?}\n", site.trend));
        output.push_str(&format!("Daily Points:          {}\n", site.daily.len()));
        output.push_str(BANNER);
        output
    }
}

fn sync_label(status: &SyncStatus) -> String {
    match status {
        SyncStatus::Idle => "idle".to_string(),
        SyncStatus::Syncing => "syncing".to_string(),
        SyncStatus::Success => "success".to_string(),
        SyncStatus::Error { message } => format!("error ({message})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpm::{predict_cpm, top_niches_by_cpm, CpmPredictionRequest};
    use crate::tracker::RevenueTracker;
    use crate::types::NewRevenueEvent;

    #[test]
    fn test_format_prediction_lists_factors() {
        let prediction = predict_cpm(&CpmPredictionRequest::new("insurance").with_month(1));
        let report = RevenueFormatter::format_prediction(&prediction);
        assert!(report.contains("CPM PREDICTION"));
        assert!(report.contains("$13.80"));
        assert!(report.contains("Seasonal adjustment (Q1)"));
    }

    #[test]
    fn test_format_niches_ranks_rows() {
        let report = RevenueFormatter::format_niches(&top_niches_by_cpm(2));
        assert!(report.contains("1    insurance"));
        assert!(report.contains("2    finance"));
    }

    #[test]
    fn test_format_summary_shows_sync_error() {
        let mut tracker = RevenueTracker::new();
        tracker.record_event(NewRevenueEvent::new("s", 1234).with_counts(1000, 0, 0));
        tracker.set_sync_status(SyncStatus::Error {
            message: "token expired".to_string(),
        });

        let report = RevenueFormatter::format_summary(&tracker.total_summary());
        assert!(report.contains("$12.34"));
        assert!(report.contains("error (token expired)"));
    }
}
