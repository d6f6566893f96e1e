//! Token gating and login.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use sermo_api::token::TokenService;

mod common;
use common::{create_test_app, create_user, send, valid_token};

// base64url of {"alg":"RS256","typ":"JWT"}
const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

#[tokio::test]
async fn protected_route_without_token_is_rejected() {
    let (app, _) = create_test_app();

    let resp = send(&app, "GET", "/users", None, None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json(), serde_json::json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn empty_token_is_rejected() {
    let (app, _) = create_test_app();

    let resp = send(&app, "GET", "/users", Some(""), None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let (app, _) = create_test_app();
    let forged = TokenService::new(b"not-the-server-secret").issue().unwrap();

    let resp = send(&app, "GET", "/users", Some(&forged), None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Unauthorized");
}

#[tokio::test]
async fn token_claiming_non_hmac_algorithm_is_rejected() {
    let (app, state) = create_test_app();
    let token = valid_token(&state);
    let (_, rest) = token.split_once('.').unwrap();
    let relabelled = format!("{RS256_HEADER}.{rest}");

    let resp = send(&app, "GET", "/users", Some(&relabelled), None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (app, state) = create_test_app();
    let stale = state
        .tokens
        .issue_at(Utc::now() - Duration::minutes(31))
        .unwrap();

    let resp = send(&app, "GET", "/users", Some(&stale), None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let (app, state) = create_test_app();
    let token = valid_token(&state);

    let resp = send(&app, "GET", "/users", Some(&token), None).await;

    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn signup_then_login_issues_token() {
    let (app, state) = create_test_app();

    let user = create_user(&app, "a@x.com", "secret").await;
    assert_eq!(user["email"], "a@x.com");
    assert_ne!(user["password"], "secret");

    let resp = send(
        &app,
        "POST",
        "/user/login",
        None,
        Some(r#"{"email":"a@x.com","password":"secret"}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text());
    let token = resp
        .headers
        .get("Token")
        .expect("login response carries a Token header")
        .to_str()
        .unwrap();
    assert!(state.tokens.validate(token));
    assert_eq!(resp.json()["userid"], user["userid"]);

    // The issued token opens protected routes.
    let resp = send(&app, "GET", "/users", Some(token), None).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (app, _) = create_test_app();
    create_user(&app, "a@x.com", "secret").await;

    let resp = send(
        &app,
        "POST",
        "/user/login",
        None,
        Some(r#"{"email":"a@x.com","password":"guess"}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json(), serde_json::json!({ "error": "Invalid login." }));
    assert!(resp.headers.get("Token").is_none());
}

#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
    let (app, _) = create_test_app();

    let resp = send(
        &app,
        "POST",
        "/user/login",
        None,
        Some(r#"{"email":"nobody@x.com","password":"secret"}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error(), "User not found");
}

#[tokio::test]
async fn login_with_malformed_body_is_bad_request() {
    let (app, _) = create_test_app();

    let resp = send(&app, "POST", "/user/login", None, Some("{not json")).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Invalid request payload");
}
