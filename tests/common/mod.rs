#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use folio_app::App;
use folio_kernel::settings::Settings;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

/// Settings with a signing secret and the cheapest bcrypt cost
pub fn test_settings(seed_sample_catalog: bool) -> Settings {
    let mut settings = Settings::default();
    settings.auth.secret_key = Some(SECRET.to_string());
    settings.auth.bcrypt_cost = 4;
    settings.books.seed_sample_catalog = seed_sample_catalog;
    settings
}

/// Fully bootstrapped app over a private in-memory database
pub async fn test_app(seed_sample_catalog: bool) -> App {
    let pool = folio_db::connect_in_memory().await.unwrap();
    App::bootstrap_with_pool(test_settings(seed_sample_catalog), pool)
        .await
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse { status, body }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

pub fn ids(body: &Value) -> Vec<u64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|book| book["id"].as_u64().unwrap())
        .collect()
}
