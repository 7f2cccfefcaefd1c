//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use innerstory_core::clock::Clock;
use innerstory_core::model::ModelClient;
use innerstory_test_support::FixedClock;
use innerstory_throttle::{RatePolicy, ThrottleSet};
use tower::ServiceExt;

use innerstory_api::routes;
use innerstory_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router with the production throttle policies and the
/// given model double. Uses the same route structure as `main.rs`.
pub fn build_test_app(model: Arc<dyn ModelClient>) -> Router {
    build_test_app_with_throttle(model, ThrottleSet::standard())
}

/// Build the full app router with custom throttle policies for tests that
/// exhaust a window.
pub fn build_test_app_with_throttle(model: Arc<dyn ModelClient>, throttle: ThrottleSet) -> Router {
    let app_state = AppState::new(fixed_clock(), model, Arc::new(throttle));

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/conversation", routes::conversation::router())
        .nest("/api/v1/admissions", routes::admissions::router())
        .with_state(app_state)
}

/// A throttle set admitting `limit` requests per minute on every class.
pub fn uniform_throttle(limit: u32) -> ThrottleSet {
    let policy = RatePolicy {
        limit,
        window: Duration::seconds(60),
    };
    ThrottleSet::new(policy, policy, policy, policy, 100)
}

/// Send a POST request with a JSON body and a fixed client IP, and return
/// the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
