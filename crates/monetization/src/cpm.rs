//! CPM prediction and monthly revenue estimates.
//!
//! Predictions are a product of fixed multipliers from [`crate::niches`]:
//! base CPM, seasonal quarter, traffic source and geo target. Confidence is a
//! display heuristic derived from the niche sample size.

use crate::niches::{geo_multiplier, niche_data, niche_table, Niche, NicheCpmData, Quarter, TrafficSource};
use chrono::{Datelike, Utc};
use ifrit_core::{format_cents, round_cents};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const RANGE_LOW: Decimal = dec!(0.7);
const RANGE_HIGH: Decimal = dec!(1.3);
const BASE_CONFIDENCE: u32 = 50;
const MAX_CONFIDENCE: u32 = 90;
const MODIFIER_PENALTY: u32 = 5;

/// Input to [`predict_cpm`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpmPredictionRequest {
    /// Niche name. Unknown names fall through to topic classification.
    #[serde(default)]
    pub niche: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub traffic_source: Option<TrafficSource>,
    /// Calendar month 1-12. Defaults to the current month.
    #[serde(default)]
    pub month: Option<u32>,
    /// ISO alpha-2 country code.
    #[serde(default)]
    pub geo_target: Option<String>,
}

impl CpmPredictionRequest {
    pub fn new(niche: impl Into<String>) -> Self {
        Self {
            niche: niche.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn with_traffic_source(mut self, source: TrafficSource) -> Self {
        self.traffic_source = Some(source);
        self
    }

    #[must_use]
    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn with_geo_target(mut self, country: impl Into<String>) -> Self {
        self.geo_target = Some(country.into());
        self
    }
}

/// Expected CPM spread in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpmRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmPrediction {
    pub niche: Niche,
    /// Estimated CPM in cents.
    pub estimated_cpm: i64,
    /// 0-100.
    pub confidence: u32,
    pub range: CpmRange,
    /// Every adjustment applied, in order.
    pub factors: Vec<String>,
}

/// Optional modifiers for [`estimate_monthly_revenue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateOptions {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub traffic_source: Option<TrafficSource>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub geo_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenueEstimate {
    pub niche: Niche,
    pub page_views: u64,
    /// CPM the estimate was computed with, in cents.
    pub cpm_used: i64,
    /// Estimated revenue in cents.
    pub estimated_revenue: i64,
    pub range: CpmRange,
    pub confidence: u32,
}

// =============================================================================
// Prediction
// =============================================================================

/// Classifies a free-text topic into a niche by keyword substring match.
///
/// Niches are checked in table order and the first hit wins; unmatched topics
/// fall back to [`Niche::FALLBACK`].
#[must_use]
pub fn classify_topic(topic: &str) -> Niche {
    let topic = topic.to_lowercase();
    Niche::ALL
        .into_iter()
        .find(|niche| niche.keywords().iter().any(|kw| topic.contains(kw)))
        .unwrap_or(Niche::FALLBACK)
}

fn resolve_niche(request: &CpmPredictionRequest) -> Niche {
    if let Some(niche) = Niche::parse(&request.niche) {
        return niche;
    }
    request
        .topic
        .as_deref()
        .map_or(Niche::FALLBACK, classify_topic)
}

/// Predicts the CPM for a niche, using the current UTC month when the request
/// carries no valid month.
#[must_use]
pub fn predict_cpm(request: &CpmPredictionRequest) -> CpmPrediction {
    predict_cpm_with_fallback_month(request, Utc::now().month())
}

/// Same as [`predict_cpm`] but with an explicit month to fall back on.
#[must_use]
pub fn predict_cpm_with_fallback_month(
    request: &CpmPredictionRequest,
    fallback_month: u32,
) -> CpmPrediction {
    let niche = resolve_niche(request);
    let data = niche_data(niche);
    let mut factors = Vec::with_capacity(4);

    let mut cpm = Decimal::from(data.avg_cpm);
    factors.push(format!("Base CPM for {niche}: {}", format_cents(data.avg_cpm)));

    let quarter = request
        .month
        .and_then(Quarter::from_month)
        .or_else(|| Quarter::from_month(fallback_month))
        .unwrap_or(Quarter::Q1);
    let seasonal = data.seasonal.for_quarter(quarter);
    cpm *= seasonal;
    if seasonal != Decimal::ONE {
        factors.push(format!("Seasonal adjustment ({quarter}): x{seasonal}"));
    }

    let mut modifiers = 0;
    if let Some(source) = request.traffic_source {
        let multiplier = data.traffic.for_source(source);
        cpm *= multiplier;
        modifiers += 1;
        factors.push(format!("Traffic source ({source}): x{multiplier}"));
    }

    if let Some(geo) = request.geo_target.as_deref() {
        let multiplier = geo_multiplier(geo);
        cpm *= multiplier;
        modifiers += 1;
        factors.push(format!("Geo target ({}): x{multiplier}", geo.trim().to_uppercase()));
    }

    let estimated_cpm = round_cents(cpm);
    let range = CpmRange {
        min: round_cents(Decimal::from(estimated_cpm) * RANGE_LOW),
        max: round_cents(Decimal::from(estimated_cpm) * RANGE_HIGH),
    };

    let confidence = (BASE_CONFIDENCE + data.sample_size / 20)
        .min(MAX_CONFIDENCE)
        .saturating_sub(MODIFIER_PENALTY * modifiers);

    tracing::debug!(%niche, estimated_cpm, confidence, "Predicted CPM");

    CpmPrediction {
        niche,
        estimated_cpm,
        confidence,
        range,
        factors,
    }
}

/// Estimates monthly revenue for a page-view volume.
#[must_use]
pub fn estimate_monthly_revenue(
    page_views: u64,
    niche: &str,
    options: &EstimateOptions,
) -> MonthlyRevenueEstimate {
    let request = CpmPredictionRequest {
        niche: niche.to_string(),
        topic: options.topic.clone(),
        traffic_source: options.traffic_source,
        month: options.month,
        geo_target: options.geo_target.clone(),
    };
    estimate_from_prediction(page_views, &predict_cpm(&request))
}

/// Scales a CPM prediction to a page-view volume.
#[must_use]
pub fn estimate_from_prediction(page_views: u64, prediction: &CpmPrediction) -> MonthlyRevenueEstimate {
    let thousands = Decimal::from(page_views) / dec!(1000);
    let scale = |cpm: i64| round_cents(thousands * Decimal::from(cpm));

    MonthlyRevenueEstimate {
        niche: prediction.niche,
        page_views,
        cpm_used: prediction.estimated_cpm,
        estimated_revenue: scale(prediction.estimated_cpm),
        range: CpmRange {
            min: scale(prediction.range.min),
            max: scale(prediction.range.max),
        },
        confidence: prediction.confidence,
    }
}

// =============================================================================
// Reference Lookups
// =============================================================================

/// Returns up to `limit` niches sorted by average CPM, highest first.
#[must_use]
pub fn top_niches_by_cpm(limit: usize) -> Vec<&'static NicheCpmData> {
    let mut niches: Vec<&NicheCpmData> = niche_table().iter().collect();
    niches.sort_by(|a, b| b.avg_cpm.cmp(&a.avg_cpm));
    niches.truncate(limit);
    niches
}

/// Looks up reference data by niche name.
#[must_use]
pub fn niche_cpm_data(name: &str) -> Option<&'static NicheCpmData> {
    Niche::parse(name).map(niche_data)
}
