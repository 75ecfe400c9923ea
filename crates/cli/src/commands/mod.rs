//! CLI subcommands.

pub mod adsense;
pub mod cpm;
pub mod drafts;

pub use adsense::{run_adsense_status, run_sync_adsense, SyncAdsenseArgs};
pub use cpm::{run_estimate, run_niches, run_predict_cpm, EstimateArgs, NichesArgs, PredictCpmArgs};
pub use drafts::{run_route_drafts, RouteDraftsArgs};
