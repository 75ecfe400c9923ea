use chrono::NaiveDate;
use ifrit_adsense::{AdSenseClient, AdSenseClientConfig, AdSenseCredentials};
use ifrit_monetization::{sync_site, RevenueTracker, SyncStatus};
use parking_lot::RwLock;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "integration-token",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> AdSenseClient {
    let config = AdSenseClientConfig::default()
        .with_api_url(server.uri())
        .with_token_url(format!("{}/token", server.uri()))
        .with_account("accounts/pub-77");
    AdSenseClient::with_credentials(config, AdSenseCredentials::new("id", "secret", "refresh"))
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
}

#[tokio::test]
async fn test_sync_site_from_adsense_report() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let rows: Vec<_> = (1..=14)
        .map(|d| {
            let earnings = if d > 7 { "3.00" } else { "2.00" };
            serde_json::json!({ "cells": [
                { "value": format!("2026-06-{d:02}") },
                { "value": "1000" },
                { "value": "1500" },
                { "value": "12" },
                { "value": earnings }
            ]})
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/accounts/pub-77/reports:generate"))
        .and(query_param("filters", "DOMAIN_NAME==cooking.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "headers": [
                { "name": "DATE", "type": "DIMENSION" },
                { "name": "PAGE_VIEWS", "type": "METRIC_TALLY" },
                { "name": "IMPRESSIONS", "type": "METRIC_TALLY" },
                { "name": "CLICKS", "type": "METRIC_TALLY" },
                { "name": "ESTIMATED_EARNINGS", "type": "METRIC_CURRENCY", "currencyCode": "USD" }
            ],
            "rows": rows
        })))
        .mount(&server)
        .await;

    let tracker = RwLock::new(RevenueTracker::new());
    let client = client_for(&server);

    let imported = sync_site(&tracker, &client, "site-3", "cooking.example.com", day(1), day(14))
        .await
        .unwrap();
    assert_eq!(imported, 14);

    let guard = tracker.read();
    let site = guard.site_revenue("site-3").unwrap();
    assert_eq!(site.total_revenue, 7 * 200 + 7 * 300);
    assert_eq!(site.total_page_views, 14_000);
    assert_eq!(site.today.revenue, 300);
    assert_eq!(*guard.sync_status(), SyncStatus::Success);
}

#[tokio::test]
async fn test_sync_site_records_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let tracker = RwLock::new(RevenueTracker::new());
    let client = client_for(&server);

    let result = sync_site(&tracker, &client, "site-3", "cooking.example.com", day(1), day(2)).await;
    assert!(result.is_err());

    match tracker.read().sync_status() {
        SyncStatus::Error { message } => assert!(message.contains("invalid_grant")),
        other => panic!("expected error status, got {other:?}"),
    };
}
