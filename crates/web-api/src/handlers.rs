use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use ifrit_content::{parse_draft, RoutingRecommendation};
use ifrit_monetization::{
    cpm, ContentRevenue, ContentSort, CpmPrediction, CpmPredictionRequest, EstimateOptions,
    MonthlyRevenueEstimate, NewRevenueEvent, Niche, NicheCpmData, RevenueEvent, RevenueImport,
    RevenueRollup, RevenueSummary, SiteRevenue, SyncStatus,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub page_views: u64,
    pub niche: String,
    #[serde(flatten)]
    pub options: EstimateOptions,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct TopContentQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort_by: ContentSort,
}

#[derive(Deserialize)]
pub struct RouteDraftRequest {
    /// Raw markdown, frontmatter included.
    pub content: String,
}

#[derive(Serialize)]
pub struct RouteDraftResponse {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub recommendation: RoutingRecommendation,
}

// =============================================================================
// CPM
// =============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

pub async fn predict_cpm(Json(req): Json<CpmPredictionRequest>) -> Json<CpmPrediction> {
    Json(cpm::predict_cpm(&req))
}

pub async fn estimate_revenue(Json(req): Json<EstimateRequest>) -> Json<MonthlyRevenueEstimate> {
    Json(cpm::estimate_monthly_revenue(
        req.page_views,
        &req.niche,
        &req.options,
    ))
}

/// Lists niches by average CPM, all of them when `limit` is omitted.
pub async fn list_niches(Query(query): Query<LimitQuery>) -> Json<Vec<NicheCpmData>> {
    let limit = query.limit.unwrap_or(Niche::ALL.len());
    Json(
        cpm::top_niches_by_cpm(limit)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// Gets reference CPM data for one niche.
///
/// # Errors
/// Returns `StatusCode::NOT_FOUND` if the niche name is unknown.
pub async fn get_niche(Path(niche): Path<String>) -> Result<Json<NicheCpmData>, StatusCode> {
    cpm::niche_cpm_data(&niche)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

// =============================================================================
// Revenue
// =============================================================================

pub async fn record_event(
    State(state): State<AppState>,
    Json(event): Json<NewRevenueEvent>,
) -> (StatusCode, Json<RevenueEvent>) {
    let recorded = state.tracker.write().record_event(event);
    (StatusCode::CREATED, Json(recorded))
}

pub async fn revenue_summary(State(state): State<AppState>) -> Json<RevenueSummary> {
    Json(state.tracker.read().total_summary())
}

/// Gets the rollup for one site.
///
/// # Errors
/// Returns `StatusCode::NOT_FOUND` if nothing has been recorded for the site.
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<SiteRevenue>, StatusCode> {
    state
        .tracker
        .read()
        .site_revenue(&site_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn top_content(
    State(state): State<AppState>,
    Query(query): Query<TopContentQuery>,
) -> Json<Vec<ContentRevenue>> {
    let limit = query.limit.unwrap_or(state.top_content_limit);
    let content = state
        .tracker
        .read()
        .top_content(limit, query.sort_by)
        .into_iter()
        .cloned()
        .collect();
    Json(content)
}

/// Gets cumulative revenue for one piece of content.
///
/// # Errors
/// Returns `StatusCode::NOT_FOUND` if the content has no recorded revenue.
pub async fn get_content(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<ContentRevenue>, StatusCode> {
    state
        .tracker
        .read()
        .content_revenue(&content_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Json<RevenueRollup> {
    Json(state.tracker.read().campaign_revenue(&campaign_id))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
) -> Json<RevenueRollup> {
    Json(state.tracker.read().author_revenue(&author_id))
}

pub async fn import_revenue(
    State(state): State<AppState>,
    Json(import): Json<RevenueImport>,
) -> Json<SiteRevenue> {
    let mut tracker = state.tracker.write();
    Json(tracker.import_revenue_data(import).clone())
}

pub async fn set_sync_status(
    State(state): State<AppState>,
    Json(status): Json<SyncStatus>,
) -> StatusCode {
    state.tracker.write().set_sync_status(status);
    StatusCode::NO_CONTENT
}

// =============================================================================
// Content
// =============================================================================

pub async fn route_draft(
    State(state): State<AppState>,
    Json(req): Json<RouteDraftRequest>,
) -> Json<RouteDraftResponse> {
    let draft = parse_draft(&req.content);
    let recommendation = state.router.recommend(&draft);
    Json(RouteDraftResponse {
        tags: draft.tags(),
        title: draft.title,
        recommendation,
    })
}

#[cfg(test)]
mod tests {
    use crate::server::ApiServer;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(state: &AppState) -> Router {
        ApiServer::new(state.clone()).router()
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // Extractor rejections are plain text
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    // ==================== CPM Route Tests ====================

    #[tokio::test]
    async fn test_health() {
        let state = AppState::default();
        let (status, body) = send(app(&state), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_predict_cpm() {
        let state = AppState::default();
        let (status, body) = send(
            app(&state),
            Method::POST,
            "/api/cpm/predict",
            Some(json!({ "niche": "insurance", "month": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimated_cpm"], 1380);
        assert_eq!(body["niche"], "insurance");
    }

    #[tokio::test]
    async fn test_estimate_scales_cpm() {
        let state = AppState::default();
        let (status, body) = send(
            app(&state),
            Method::POST,
            "/api/cpm/estimate",
            Some(json!({ "page_views": 10000, "niche": "technology", "month": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let cpm_used = body["cpm_used"].as_i64().unwrap();
        assert_eq!(body["estimated_revenue"].as_i64().unwrap(), cpm_used * 10);
    }

    #[tokio::test]
    async fn test_list_niches_with_limit() {
        let state = AppState::default();
        let (status, body) = send(app(&state), Method::GET, "/api/cpm/niches?limit=3", None).await;
        assert_eq!(status, StatusCode::OK);
        let niches = body.as_array().unwrap();
        assert_eq!(niches.len(), 3);
        assert!(niches[0]["avg_cpm"].as_i64() >= niches[1]["avg_cpm"].as_i64());

        let (_, all) = send(app(&state), Method::GET, "/api/cpm/niches", None).await;
        assert_eq!(all.as_array().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_get_niche_and_unknown() {
        let state = AppState::default();
        let (status, body) = send(app(&state), Method::GET, "/api/cpm/niches/Finance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["niche"], "finance");

        let (status, _) = send(app(&state), Method::GET, "/api/cpm/niches/astrology", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ==================== Revenue Route Tests ====================

    #[tokio::test]
    async fn test_record_event_then_query() {
        let state = AppState::default();
        for (content, revenue, views) in [("post-1", 250, 100), ("post-2", 900, 50)] {
            let (status, body) = send(
                app(&state),
                Method::POST,
                "/api/revenue/events",
                Some(json!({
                    "site_id": "site-1",
                    "content_id": content,
                    "campaign_id": "spring",
                    "revenue": revenue,
                    "page_views": views
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert!(body["id"].is_string());
        }

        let (_, summary) = send(app(&state), Method::GET, "/api/revenue/summary", None).await;
        assert_eq!(summary["total_revenue"], 1150);
        assert_eq!(summary["event_count"], 2);

        let (status, site) = send(app(&state), Method::GET, "/api/revenue/sites/site-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(site["total_revenue"], 1150);

        let (_, top) = send(
            app(&state),
            Method::GET,
            "/api/revenue/content/top?limit=1&sort_by=page_views",
            None,
        )
        .await;
        let top = top.as_array().unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0]["content_id"], "post-1");

        let (status, content) = send(app(&state), Method::GET, "/api/revenue/content/post-2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content["revenue"], 900);

        let (_, campaign) = send(app(&state), Method::GET, "/api/revenue/campaigns/spring", None).await;
        assert_eq!(campaign["total_revenue"], 1150);
        assert_eq!(campaign["content_count"], 2);
    }

    #[tokio::test]
    async fn test_missing_site_and_content_are_404() {
        let state = AppState::default();
        let (status, _) = send(app(&state), Method::GET, "/api/revenue/sites/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(app(&state), Method::GET, "/api/revenue/content/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_author_is_zeroed_rollup() {
        let state = AppState::default();
        let (status, body) = send(app(&state), Method::GET, "/api/revenue/authors/ghost", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_revenue"], 0);
        assert_eq!(body["content"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_import_and_sync_status() {
        let state = AppState::default();
        let (status, site) = send(
            app(&state),
            Method::POST,
            "/api/revenue/import",
            Some(json!({
                "site_id": "site-9",
                "domain": "garden.example.com",
                "data_points": [
                    { "date": "2026-03-01", "page_views": 1000, "revenue": 400 },
                    { "date": "2026-03-02", "page_views": 2000, "revenue": 600 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(site["total_revenue"], 1000);
        assert_eq!(site["domain"], "garden.example.com");

        let (status, _) = send(
            app(&state),
            Method::PUT,
            "/api/revenue/sync-status",
            Some(json!({ "state": "error", "message": "quota exceeded" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, summary) = send(app(&state), Method::GET, "/api/revenue/summary", None).await;
        assert_eq!(summary["sync_status"]["state"], "error");
        assert_eq!(summary["sync_status"]["message"], "quota exceeded");
    }

    #[tokio::test]
    async fn test_malformed_event_rejected() {
        let state = AppState::default();
        let (status, _) = send(
            app(&state),
            Method::POST,
            "/api/revenue/events",
            Some(json!({ "revenue": "lots" })),
        )
        .await;
        assert!(status.is_client_error());
        assert_eq!(state.tracker.read().events().len(), 0);
    }

    // ==================== Content Route Tests ====================

    #[tokio::test]
    async fn test_route_draft() {
        let state = AppState::default();
        let (status, body) = send(
            app(&state),
            Method::POST,
            "/api/content/route",
            Some(json!({ "content": "---\ntags: [esports]\n---\n# Console tier list\n" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Console tier list");
        assert_eq!(body["recommendation"]["category"], "gaming");
        assert_eq!(body["tags"][0], "esports");
    }
}
