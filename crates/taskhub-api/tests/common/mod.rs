//! 통합 테스트 공용 헬퍼.
//!
//! 인메모리 저장소로 구성한 전체 라우터에 `oneshot`으로 요청을 보냅니다.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use taskhub_api::{build_app, AppState};
use taskhub_core::AppConfig;

pub const SUPERUSER_EMAIL: &str = "admin@jobhook.com";

/// 기본 설정과 인메모리 저장소로 라우터를 만듭니다.
pub fn test_app() -> Router {
    build_app(Arc::new(AppState::in_memory(AppConfig::default())))
}

/// 요청을 보내고 상태 코드와 JSON 본문을 돌려줍니다.
///
/// 본문이 비어 있으면 `Value::Null`입니다.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// 가입 후 로그인하여 토큰을 반환합니다.
pub async fn user_token(app: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = register(app, name, email, password).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// 슈퍼유저 토큰.
pub async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, SUPERUSER_EMAIL, "admin").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// 슈퍼유저로 태스크를 만들고 ID를 반환합니다.
pub async fn create_task(app: &Router, admin: &str, body: Value) -> i64 {
    let (status, task) = send(app, Method::POST, "/tasks", Some(admin), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    task["id"].as_i64().unwrap()
}
