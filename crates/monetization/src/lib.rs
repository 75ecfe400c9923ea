pub mod cpm;
pub mod formatter;
pub mod niches;
pub mod source;
pub mod tracker;
pub mod types;

pub use cpm::{
    classify_topic, estimate_monthly_revenue, niche_cpm_data, predict_cpm, top_niches_by_cpm,
    CpmPrediction, CpmPredictionRequest, CpmRange, EstimateOptions, MonthlyRevenueEstimate,
};
pub use formatter::RevenueFormatter;
pub use niches::{Niche, NicheCpmData, Quarter, TrafficSource};
pub use source::{sync_site, RevenueSource};
pub use tracker::RevenueTracker;
pub use types::{
    AdNetwork, ContentRevenue, ContentSort, NewRevenueEvent, PeriodRevenue, RevenueDataPoint,
    RevenueEvent, RevenueImport, RevenueRollup, RevenueSummary, SiteRevenue, SyncStatus,
    TopContent, Trend,
};
