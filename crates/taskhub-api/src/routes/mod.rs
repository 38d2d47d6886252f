//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth` - 가입, 로그인, 비밀번호 재설정 요청
//! - `/tasks` - 태스크 조회 및 변경
//! - `/admin` - 관리자 전용 작업

pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

pub use admin::{admin_router, ApproveQuery, AssignQuery};
pub use auth::{auth_router, ForgotPasswordQuery, MessageResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use tasks::tasks_router;

use axum::{middleware, Router};
use std::sync::Arc;

use crate::auth::identity_interceptor;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/auth", auth_router())
        .nest("/tasks", tasks_router())
        .nest("/admin", admin_router())
}

/// 상태와 요청 신원 인터셉터가 적용된 애플리케이션 라우터.
///
/// 관측용 레이어(메트릭, 트레이싱, 타임아웃, CORS)는 바이너리에서 덧붙입니다.
pub fn build_app(state: Arc<AppState>) -> Router {
    let codec = state.token_codec.clone();
    create_api_router()
        .layer(middleware::from_fn_with_state(codec, identity_interceptor))
        .with_state(state)
}
