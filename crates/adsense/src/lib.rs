//! Google AdSense Management API v2 adapter.
//!
//! This crate provides:
//! - OAuth2 refresh-token authentication with a cached access token
//! - A rate-limited REST client for accounts, sites and reports
//! - Typed report models with earnings converted to integer cents
//! - A best-effort facade that never returns errors to the dashboard
//!
//! # Authentication
//!
//! Set the following environment variables:
//!
//! - `ADSENSE_CLIENT_ID`: OAuth2 client id
//! - `ADSENSE_CLIENT_SECRET`: OAuth2 client secret
//! - `ADSENSE_REFRESH_TOKEN`: refresh token with the `adsense.readonly` scope
//!
//! # API Endpoints
//!
//! - `GET /v2/accounts` - List accounts
//! - `GET /v2/{account}/sites` - List sites
//! - `GET /v2/{account}/reports:generate` - Generate a report

pub mod auth;
pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use auth::{AdSenseAuth, AdSenseAuthConfig, AdSenseCredentials};
pub use client::{AdSenseClient, AdSenseClientConfig, ADSENSE_API_URL, GOOGLE_TOKEN_URL};
pub use error::{AdSenseError, Result};
pub use service::{AdSenseService, ConnectionStatus, EarningsSummary};
pub use types::{
    currency_to_cents, micros_to_cents, Account, Dimension, Header, HeaderType, Metric, Report,
    ReportRequest, Row, Site,
};
