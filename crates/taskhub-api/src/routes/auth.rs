//! 인증 API 라우트.
//!
//! # 엔드포인트
//!
//! - `POST /auth/register` - 가입
//! - `POST /auth/login` - 로그인 및 토큰 발급
//! - `POST /auth/forgot-password?email=` - 비밀번호 재설정 OTP 요청 (스텁)

use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// 단순 메시지 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 비밀번호 재설정 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ForgotPasswordQuery {
    pub email: String,
}

/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "가입 성공", body = MessageResponse),
        (status = 400, description = "입력 검증 실패", body = crate::error::ApiErrorResponse),
        (status = 409, description = "이미 가입된 이메일", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<MessageResponse>> {
    request.validate()?;
    let message = state.authenticator.register(request).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "사용자 없음 또는 비밀번호 불일치", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.authenticator.login(request).await?;
    Ok(Json(response))
}

/// POST /auth/forgot-password
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    params(ForgotPasswordQuery),
    responses((status = 200, description = "요청 접수", body = MessageResponse))
)]
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ForgotPasswordQuery>,
) -> Json<MessageResponse> {
    Json(MessageResponse::new(state.authenticator.send_otp(&query.email)))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
}
