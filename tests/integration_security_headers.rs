mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use kampus::kampus_models::UserType;
use kampus::middleware::security_headers::SECURITY_HEADERS;

fn assert_secured(response: &common::TestResponse, context: &str) {
    for (name, value) in SECURITY_HEADERS {
        assert_eq!(
            response.headers.get(&name).map(|v| v.to_str().unwrap()),
            Some(value),
            "{} missing on {}",
            name,
            context
        );
    }
}

#[tokio::test]
async fn test_headers_on_every_outcome() {
    let app = TestApp::new();
    let student = app.create_user(Some(UserType::Student), false).await;

    let cases = [
        ("/health", None, StatusCode::OK),
        ("/api/me", None, StatusCode::OK),
        ("/api/students/me/gpa", None, StatusCode::UNAUTHORIZED),
        ("/api/admin/users", Some(student.token.as_str()), StatusCode::FORBIDDEN),
        ("/api/nowhere", None, StatusCode::NOT_FOUND),
        ("/not-an-api-path", None, StatusCode::NOT_FOUND),
        ("/api-docs/openapi.json", None, StatusCode::OK),
    ];

    for (path, token, status) in cases {
        let response = app.get(path, token).await;
        assert_eq!(response.status, status, "{}", path);
        assert_secured(&response, path);
    }
}

#[tokio::test]
async fn test_headers_on_rejected_body() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": "not-an-email", "password": "x" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_secured(&response, "/api/auth/login");
}
