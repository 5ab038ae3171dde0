mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use kampus::kampus_models::UserType;
use serde_json::json;

const PASSWORD: &str = "testpass123";

fn login_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let teacher = app
        .create_user_with_password(Some(UserType::Teacher), false, PASSWORD, true)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(login_body(&teacher.user.email, PASSWORD)),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["email"], teacher.user.email.as_str());
    assert_eq!(response.body["role"], "teacher");
    assert!(response.body["user"].get("password_hash").is_none());

    let token = response.body["access_token"].as_str().unwrap();
    let me = app.get("/api/me", Some(token)).await;
    assert_eq!(me.body["user_type"], "teacher");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    let user = app
        .create_user_with_password(Some(UserType::Student), false, PASSWORD, true)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(login_body(&user.user.email, "wrongpass")),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(login_body("nobody@kampus.edu", PASSWORD)),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_validation() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(login_body("not-an-email", PASSWORD)),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "Invalid email format");
}

#[tokio::test]
async fn test_notices_require_authentication() {
    let app = TestApp::new();
    let response = app.get("/api/notices", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
