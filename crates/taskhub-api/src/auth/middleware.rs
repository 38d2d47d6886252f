//! 요청 신원 인터셉터와 Axum 추출기.
//!
//! 인터셉터는 모든 요청에서 `Authorization: Bearer <token>` 헤더를 읽어
//! 검증에 성공하면 [`RequestIdentity`]를 요청 extensions에 넣습니다.
//! 토큰이 없거나 잘못된 경우에도 요청을 거부하지 않고 익명으로 통과시키며,
//! 인증 요구 여부는 각 핸들러의 추출기가 결정합니다.
//!
//! ```rust,ignore
//! async fn protected_handler(CurrentIdentity(identity): CurrentIdentity) -> String {
//!     format!("Hello, {}!", identity.subject)
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use taskhub_core::Role;

use super::jwt::{Claims, TokenCodec};
use crate::error::ApiErrorResponse;

/// 검증된 요청 신원. 요청 하나의 수명 동안만 존재합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    /// 토큰의 subject (사용자 이메일)
    pub subject: String,
    pub role: Role,
}

impl RequestIdentity {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for RequestIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

/// `Authorization` 헤더에서 Bearer 토큰 추출.
///
/// 접두사는 정확히 `"Bearer "`여야 합니다.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// 요청 신원 인터셉터.
///
/// 요청을 거부하지 않으며, 요청 extensions 외의 상태를 변경하지 않습니다.
pub async fn identity_interceptor(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match codec.validate(token) {
            Some(claims) => {
                let identity = RequestIdentity::from(claims);
                tracing::trace!(subject = %identity.subject, role = %identity.role, "요청 신원 확인");
                request.extensions_mut().insert(identity);
            }
            None => {
                tracing::debug!(path = %request.uri().path(), "유효하지 않은 토큰, 익명으로 처리");
            }
        }
    }

    next.run(request).await
}

/// 신원 추출 실패.
#[derive(Debug, thiserror::Error)]
pub enum IdentityRejection {
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Admin role required")]
    AdminRequired,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            IdentityRejection::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_REQUIRED")
            }
            IdentityRejection::AdminRequired => (StatusCode::FORBIDDEN, "ADMIN_REQUIRED"),
        };

        (status, Json(ApiErrorResponse::new(code, self.to_string()))).into_response()
    }
}

/// 인증된 신원을 요구하는 추출기. 익명 요청은 401.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub RequestIdentity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(IdentityRejection::AuthenticationRequired)
    }
}

/// 선택적 신원 추출기. 공개 라우트에서 사용합니다.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<RequestIdentity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<RequestIdentity>().cloned()))
    }
}

/// ADMIN 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub RequestIdentity);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) = CurrentIdentity::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            tracing::warn!(subject = %identity.subject, "관리자 전용 경로 접근 거부");
            crate::metrics::record_access_denied("admin");
            return Err(IdentityRejection::AdminRequired);
        }
        Ok(AdminIdentity(identity))
    }
}
