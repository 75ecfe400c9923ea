//! Typed AdSense Management API v2 models.
//!
//! These are the public shapes; the wire formats live in `client` and are
//! converted on the way in.

use chrono::NaiveDate;
use ifrit_core::round_cents;
use ifrit_monetization::RevenueDataPoint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Accounts & Sites
// =============================================================================

/// An AdSense publisher account, e.g. `accounts/pub-1234567890`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Resource name, `accounts/{account}`.
    pub name: String,
    pub display_name: String,
    pub time_zone: Option<String>,
    pub state: Option<String>,
}

impl Account {
    /// Returns the publisher id portion of the resource name.
    #[must_use]
    pub fn publisher_id(&self) -> &str {
        self.name.strip_prefix("accounts/").unwrap_or(&self.name)
    }
}

/// A site registered under an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Resource name, `accounts/{account}/sites/{site}`.
    pub name: String,
    pub domain: String,
    pub reporting_dimension_id: Option<String>,
    pub state: Option<String>,
    pub auto_ads_enabled: bool,
}

// =============================================================================
// Report Requests
// =============================================================================

/// Report metrics used by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    PageViews,
    AdRequests,
    Impressions,
    Clicks,
    EstimatedEarnings,
    PageViewsRpm,
}

impl Metric {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::PageViews => "PAGE_VIEWS",
            Metric::AdRequests => "AD_REQUESTS",
            Metric::Impressions => "IMPRESSIONS",
            Metric::Clicks => "CLICKS",
            Metric::EstimatedEarnings => "ESTIMATED_EARNINGS",
            Metric::PageViewsRpm => "PAGE_VIEWS_RPM",
        }
    }
}

/// Report dimensions used by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Date,
    Month,
    DomainName,
}

impl Dimension {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Date => "DATE",
            Dimension::Month => "MONTH",
            Dimension::DomainName => "DOMAIN_NAME",
        }
    }
}

/// Parameters for `reports:generate` with a custom date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metrics: Vec<Metric>,
    pub dimensions: Vec<Dimension>,
    /// Raw filter expressions, e.g. `DOMAIN_NAME==example.com`.
    pub filters: Vec<String>,
    pub currency_code: Option<String>,
}

impl ReportRequest {
    /// Daily page views, impressions, clicks and earnings.
    #[must_use]
    pub fn daily_earnings(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            metrics: vec![
                Metric::PageViews,
                Metric::Impressions,
                Metric::Clicks,
                Metric::EstimatedEarnings,
            ],
            dimensions: vec![Dimension::Date],
            filters: Vec::new(),
            currency_code: None,
        }
    }

    /// Restricts the report to one domain.
    #[must_use]
    pub fn for_domain(mut self, domain: &str) -> Self {
        self.filters.push(format!("{}=={domain}", Dimension::DomainName.as_str()));
        self
    }

    #[must_use]
    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Kind of value a report column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderType {
    Dimension,
    MetricTally,
    MetricRatio,
    /// Decimal string in account currency units.
    MetricCurrency,
    /// Integer millionths of a currency unit.
    MetricMicros,
    MetricMilliseconds,
    MetricDecimal,
    Unspecified,
}

impl HeaderType {
    /// Parses the API's header type string; unknown values become `Unspecified`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "DIMENSION" => HeaderType::Dimension,
            "METRIC_TALLY" => HeaderType::MetricTally,
            "METRIC_RATIO" => HeaderType::MetricRatio,
            "METRIC_CURRENCY" => HeaderType::MetricCurrency,
            "METRIC_MICROS" => HeaderType::MetricMicros,
            "METRIC_MILLISECONDS" => HeaderType::MetricMilliseconds,
            "METRIC_DECIMAL" => HeaderType::MetricDecimal,
            _ => HeaderType::Unspecified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub header_type: HeaderType,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Option<String>>,
}

impl Row {
    /// Returns the cell value at `index`, if present.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub headers: Vec<Header>,
    pub rows: Vec<Row>,
    pub totals: Option<Row>,
    pub total_matched_rows: u64,
}

impl Report {
    /// Position of the column with the given header name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.name == name)
    }

    /// Reads a cell by header name.
    #[must_use]
    pub fn cell<'a>(&self, row: &'a Row, name: &str) -> Option<&'a str> {
        self.column_index(name).and_then(|i| row.cell(i))
    }

    /// Reads an integer tally cell, treating missing or malformed values as 0.
    #[must_use]
    pub fn tally(&self, row: &Row, metric: Metric) -> u64 {
        self.cell(row, metric.as_str())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Reads an earnings cell as cents, honoring the column's header type.
    #[must_use]
    pub fn money_cents(&self, row: &Row, metric: Metric) -> Option<i64> {
        let index = self.column_index(metric.as_str())?;
        let value = row.cell(index)?;
        match self.headers[index].header_type {
            HeaderType::MetricMicros => value.parse::<i64>().ok().map(micros_to_cents),
            _ => currency_to_cents(value),
        }
    }

    /// Earnings in the totals row, in cents.
    #[must_use]
    pub fn total_earnings_cents(&self) -> Option<i64> {
        self.totals
            .as_ref()
            .and_then(|row| self.money_cents(row, Metric::EstimatedEarnings))
    }

    /// Converts DATE rows into one data point per day, summing rows that
    /// share a date.
    ///
    /// When the report carries a `DOMAIN_NAME` column, rows for other domains
    /// are skipped. Rows without a parseable date are dropped.
    #[must_use]
    pub fn to_daily_points(&self, domain: &str) -> Vec<RevenueDataPoint> {
        let Some(date_index) = self.column_index(Dimension::Date.as_str()) else {
            return Vec::new();
        };
        let domain_index = self.column_index(Dimension::DomainName.as_str());

        let mut by_date: BTreeMap<NaiveDate, (u64, u64, u64, i64)> = BTreeMap::new();
        for row in &self.rows {
            if let Some(i) = domain_index {
                if !row.cell(i).is_some_and(|d| d.eq_ignore_ascii_case(domain)) {
                    continue;
                }
            }
            let Some(date) = row
                .cell(date_index)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            else {
                continue;
            };

            let entry = by_date.entry(date).or_default();
            entry.0 += self.tally(row, Metric::PageViews);
            entry.1 += self.tally(row, Metric::Impressions);
            entry.2 += self.tally(row, Metric::Clicks);
            entry.3 += self.money_cents(row, Metric::EstimatedEarnings).unwrap_or(0);
        }

        by_date
            .into_iter()
            .map(|(date, (page_views, impressions, clicks, revenue))| {
                RevenueDataPoint::new(date, page_views, impressions, clicks, revenue)
            })
            .collect()
    }
}

// =============================================================================
// Money Conversion
// =============================================================================

/// Converts micros (millionths of a currency unit) to cents, half away from zero.
#[must_use]
pub fn micros_to_cents(micros: i64) -> i64 {
    round_cents(Decimal::from(micros) / Decimal::from(10_000))
}

/// Converts a decimal currency string such as `"12.345"` to cents.
#[must_use]
pub fn currency_to_cents(value: &str) -> Option<i64> {
    Decimal::from_str(value.trim())
        .ok()
        .map(|amount| round_cents(amount * Decimal::ONE_HUNDRED))
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
