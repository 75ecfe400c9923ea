use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    #[must_use]
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/cpm/predict", post(handlers::predict_cpm))
            .route("/api/cpm/estimate", post(handlers::estimate_revenue))
            .route("/api/cpm/niches", get(handlers::list_niches))
            .route("/api/cpm/niches/:niche", get(handlers::get_niche))
            .route("/api/revenue/events", post(handlers::record_event))
            .route("/api/revenue/summary", get(handlers::revenue_summary))
            .route("/api/revenue/sites/:site_id", get(handlers::get_site))
            .route("/api/revenue/content/top", get(handlers::top_content))
            .route("/api/revenue/content/:content_id", get(handlers::get_content))
            .route("/api/revenue/campaigns/:campaign_id", get(handlers::get_campaign))
            .route("/api/revenue/authors/:author_id", get(handlers::get_author))
            .route("/api/revenue/import", post(handlers::import_revenue))
            .route("/api/revenue/sync-status", put(handlers::set_sync_status))
            .route("/api/content/route", post(handlers::route_draft))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
