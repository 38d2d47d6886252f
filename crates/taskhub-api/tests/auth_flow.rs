//! 가입/로그인 통합 테스트.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login_flow() {
    let app = test_app();

    let (status, body) = register(&app, "Alice", "alice@x.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User Registered Successfully");

    let (status, body) = login(&app, "alice@x.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "USER");
    assert_eq!(body["email"], "alice@x.com");
    assert_eq!(body["name"], "Alice");
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, body) = login(&app, "alice@x.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app();

    let (status, _) = register(&app, "Alice", "alice@x.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&app, "Alice Again", "alice@x.com", "other").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_EMAIL");

    // 기존 비밀번호는 그대로 유지
    let (status, _) = login(&app, "alice@x.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_superuser_email_cannot_be_registered() {
    let app = test_app();

    let (status, _) = register(&app, "Mallory", SUPERUSER_EMAIL, "hunter2").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_user_login() {
    let app = test_app();

    let (status, body) = login(&app, "nobody@x.com", "pw").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_superuser_login_with_either_password() {
    let app = test_app();

    for password in ["admin", "Admin"] {
        let (status, body) = login(&app, SUPERUSER_EMAIL, password).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "ADMIN");
        assert_eq!(body["email"], SUPERUSER_EMAIL);
    }
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app();

    let (status, body) = register(&app, "", "not-an-email", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].is_object());
}

#[tokio::test]
async fn test_forgot_password_stub() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/forgot-password?email=alice@x.com",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("OTP"));
}

#[tokio::test]
async fn test_user_token_is_accepted_by_protected_routes() {
    let app = test_app();
    let token = user_token(&app, "Bob", "bob@x.com", "pw").await;

    // 일반 사용자는 태스크를 만들 수 없지만 인증 자체는 통과
    let (status, body) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(&token),
        Some(json!({ "title": "Report" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "ACCESS_DENIED");

    // 위조된 토큰은 익명으로 취급되어 401
    let (status, body) = send(
        &app,
        Method::POST,
        "/tasks",
        Some("not.a.token"),
        Some(json!({ "title": "Report" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");
}
