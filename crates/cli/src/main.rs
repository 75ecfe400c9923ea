use anyhow::Context;
use clap::{Parser, Subcommand};
use ifrit_core::{AppConfig, ConfigLoader, DEFAULT_CONFIG_PATH};
use ifrit_monetization::RevenueTracker;
use ifrit_web_api::{ApiServer, AppState};
use parking_lot::RwLock;
use std::sync::Arc;

mod commands;

use commands::{EstimateArgs, NichesArgs, PredictCpmArgs, RouteDraftsArgs, SyncAdsenseArgs};

#[derive(Parser)]
#[command(name = "ifrit")]
#[command(about = "CPM prediction, revenue tracking and draft routing for content sites", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Server address (defaults to server.host:server.port)
        #[arg(short, long)]
        addr: Option<String>,
    },
    /// Predict the CPM for a niche
    PredictCpm(PredictCpmArgs),
    /// Estimate monthly ad revenue for a page-view volume
    Estimate(EstimateArgs),
    /// List niches by average CPM
    Niches(NichesArgs),
    /// Check the AdSense connection
    AdsenseStatus,
    /// Import daily AdSense earnings for one site
    SyncAdsense(SyncAdsenseArgs),
    /// Route the markdown drafts folder to content categories
    RouteDrafts(RouteDraftsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ConfigLoader::load_from(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;

    match cli.command {
        Commands::Serve { addr } => {
            run_server(addr, &config).await?;
        }
        Commands::PredictCpm(args) => {
            commands::run_predict_cpm(&args)?;
        }
        Commands::Estimate(args) => {
            commands::run_estimate(&args)?;
        }
        Commands::Niches(args) => {
            commands::run_niches(&args)?;
        }
        Commands::AdsenseStatus => {
            commands::run_adsense_status(&config).await?;
        }
        Commands::SyncAdsense(args) => {
            commands::run_sync_adsense(args, &config).await?;
        }
        Commands::RouteDrafts(args) => {
            commands::run_route_drafts(&args, &config)?;
        }
    }

    Ok(())
}

async fn run_server(addr: Option<String>, config: &AppConfig) -> anyhow::Result<()> {
    let addr = addr.unwrap_or_else(|| config.server.addr());
    tracing::info!("Starting Ifrit API server on {}", addr);

    let tracker = Arc::new(RwLock::new(RevenueTracker::new()));
    let state =
        AppState::new(tracker).with_top_content_limit(config.monetization.top_content_limit);

    ApiServer::new(state).serve(&addr).await
}
