use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use sermo_api::token::TokenService;
use sermo_api::{AppState, AppStateInner, create_router};
use sermo_db::Database;

pub const TEST_SECRET: &[u8] = b"test-signing-secret";

/// Router over a fresh in-memory database, plus the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, AppState) {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let state: AppState = Arc::new(AppStateInner::new(db, TokenService::new(TEST_SECRET), "test"));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn valid_token(state: &AppState) -> String {
    state.tokens.issue().expect("Failed to issue token")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }

    pub fn error(&self) -> String {
        self.json()["error"].as_str().unwrap_or_default().to_string()
    }
}

/// Send one request through the router.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Token", token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse { status, headers, body }
}

/// Sign up a user and return the created record.
#[allow(dead_code)]
pub async fn create_user(app: &Router, email: &str, password: &str) -> Value {
    let body = serde_json::json!({ "email": email, "password": password }).to_string();
    let resp = send(app, "POST", "/user", None, Some(&body)).await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.text());
    resp.json()
}

#[allow(dead_code)]
pub async fn create_channel(app: &Router, token: &str, name: &str, owner: &str) -> Value {
    let body = serde_json::json!({ "channelname": name, "maxpopulation": 10, "userid": owner }).to_string();
    let resp = send(app, "POST", "/channel", Some(token), Some(&body)).await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.text());
    resp.json()
}

#[allow(dead_code)]
pub async fn create_data(app: &Router, token: &str, strattr: &str, intattr: i64) -> Value {
    let body = serde_json::json!({ "strattr": strattr, "intattr": intattr }).to_string();
    let resp = send(app, "POST", "/data", Some(token), Some(&body)).await;
    assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.text());
    resp.json()
}
