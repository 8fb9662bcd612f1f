//! Router assembly tests
//!
//! Exercise the assembled router without a live database: `/health` and
//! the CORS layer never touch the pool, and `connect_lazy` defers any
//! connection attempt.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt; // for `oneshot`

use goa_server::api;
use goa_server::config::Config;
use goa_server::features::AppState;
use goa_server::cache::memory::MemoryCache;
use goa_server::query::filer::FilerClient;

fn test_state() -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/goa_test")
        .unwrap();
    AppState::new(
        pool,
        Arc::new(MemoryCache::new()),
        FilerClient::new("http://localhost:1"),
    )
}

#[tokio::test]
async fn test_health() {
    let app = api::create_router(&Config::default(), test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_credentials_from_config() {
    let mut config = Config::default();
    config.cors.allowed_origins = vec!["http://localhost:3000".to_string()];
    config.cors.allow_credentials = true;

    let app = api::create_router(&config, test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn test_cors_credentials_disabled() {
    let mut config = Config::default();
    config.cors.allow_credentials = false;

    let app = api::create_router(&config, test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .is_none());
}
