//! CPM prediction and revenue estimate commands.

use anyhow::Result;
use clap::Args;
use ifrit_monetization::{
    cpm, CpmPredictionRequest, EstimateOptions, Niche, RevenueFormatter, TrafficSource,
};

/// Parses a traffic source name (`organic`, `search`, `paid`, ...).
pub fn parse_traffic_source(value: &str) -> Result<TrafficSource, String> {
    TrafficSource::parse(value).ok_or_else(|| {
        format!("unknown traffic source '{value}' (expected organic, direct, referral, email, paid or social)")
    })
}

/// Modifiers shared by `predict-cpm` and `estimate`.
#[derive(Args, Debug, Clone, Default)]
pub struct CpmModifiers {
    /// Free-text topic, used to pick a niche when `--niche` is unknown
    #[arg(long)]
    pub topic: Option<String>,

    /// Traffic source (organic, direct, referral, email, paid, social)
    #[arg(long, value_parser = parse_traffic_source)]
    pub source: Option<TrafficSource>,

    /// Two-letter country code of the target audience (e.g., "US", "DE")
    #[arg(long)]
    pub geo: Option<String>,

    /// Month 1-12 for seasonality; defaults to the current month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

/// Arguments for the predict-cpm command.
#[derive(Args, Debug, Clone)]
pub struct PredictCpmArgs {
    /// Content niche (e.g., "insurance", "technology")
    #[arg(long)]
    pub niche: String,

    #[command(flatten)]
    pub modifiers: CpmModifiers,
}

impl PredictCpmArgs {
    #[must_use]
    pub fn to_request(&self) -> CpmPredictionRequest {
        CpmPredictionRequest {
            niche: self.niche.clone(),
            topic: self.modifiers.topic.clone(),
            traffic_source: self.modifiers.source,
            month: self.modifiers.month,
            geo_target: self.modifiers.geo.clone(),
        }
    }
}

/// Arguments for the estimate command.
#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Expected monthly page views
    #[arg(long)]
    pub page_views: u64,

    /// Content niche
    #[arg(long)]
    pub niche: String,

    #[command(flatten)]
    pub modifiers: CpmModifiers,
}

impl EstimateArgs {
    #[must_use]
    pub fn to_options(&self) -> EstimateOptions {
        EstimateOptions {
            topic: self.modifiers.topic.clone(),
            traffic_source: self.modifiers.source,
            month: self.modifiers.month,
            geo_target: self.modifiers.geo.clone(),
        }
    }
}

/// Arguments for the niches command.
#[derive(Args, Debug, Clone)]
pub struct NichesArgs {
    /// Number of niches to show, highest CPM first
    #[arg(long, default_value_t = Niche::ALL.len())]
    pub limit: usize,
}

/// Runs the predict-cpm command.
///
/// # Errors
/// Never fails; returns `Result` for uniform dispatch.
pub fn run_predict_cpm(args: &PredictCpmArgs) -> Result<()> {
    let prediction = cpm::predict_cpm(&args.to_request());
    tracing::debug!(niche = %prediction.niche, cpm = prediction.estimated_cpm, "Predicted CPM");
    println!("{}", RevenueFormatter::format_prediction(&prediction));
    Ok(())
}

/// Runs the estimate command.
///
/// # Errors
/// Never fails; returns `Result` for uniform dispatch.
pub fn run_estimate(args: &EstimateArgs) -> Result<()> {
    let estimate = cpm::estimate_monthly_revenue(args.page_views, &args.niche, &args.to_options());
    println!("{}", RevenueFormatter::format_estimate(&estimate));
    Ok(())
}

/// Runs the niches command.
///
/// # Errors
/// Never fails; returns `Result` for uniform dispatch.
pub fn run_niches(args: &NichesArgs) -> Result<()> {
    let niches = cpm::top_niches_by_cpm(args.limit);
    println!("{}", RevenueFormatter::format_niches(&niches));
    Ok(())
}
