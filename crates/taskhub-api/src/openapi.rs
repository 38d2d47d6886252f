//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use taskhub_core::{
    Announcement, AnnouncementKind, NewAnnouncement, NewProject, Project, Role, Task,
    TaskAnalytics, TaskInput, TaskStatus, UserSummary,
};

use crate::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiErrorResponse;
use crate::routes::{ComponentHealth, ComponentStatus, HealthResponse, MessageResponse};

/// Bearer 토큰 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// TaskHub API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TaskHub API",
        description = r#"
# TaskHub 태스크 관리 REST API

가입/로그인, 태스크 제출과 승인, 관리자 작업을 위한 API입니다.

## 인증

`POST /auth/login`으로 발급받은 토큰을 `Authorization: Bearer <token>` 헤더에 포함하세요.
토큰은 기본 24시간 유효합니다. 조회 API는 토큰 없이도 호출할 수 있습니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 가입 및 토큰 발급"),
        (name = "tasks", description = "태스크 - 조회, 생성, 수정, 삭제"),
        (name = "admin", description = "관리자 - 사용자/태스크/프로젝트/공지 관리")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Role,

            // ===== Tasks =====
            Task,
            TaskInput,
            TaskStatus,
            Announcement,
            AnnouncementKind,

            // ===== Admin =====
            UserSummary,
            TaskAnalytics,
            Project,
            NewProject,
            NewAnnouncement,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::forgot_password,

        // ===== Tasks =====
        crate::routes::tasks::list_tasks,
        crate::routes::tasks::get_task,
        crate::routes::tasks::list_announcements,
        crate::routes::tasks::create_task,
        crate::routes::tasks::update_task,
        crate::routes::tasks::delete_task,

        // ===== Admin =====
        crate::routes::admin::list_users,
        crate::routes::admin::list_all_tasks,
        crate::routes::admin::assign_task,
        crate::routes::admin::edit_task,
        crate::routes::admin::approve_task,
        crate::routes::admin::reject_task,
        crate::routes::admin::delete_task,
        crate::routes::admin::purge_old_tasks,
        crate::routes::admin::create_announcement,
        crate::routes::admin::analytics,
        crate::routes::admin::create_project,
        crate::routes::admin::list_projects,
    )
)]
pub struct ApiDoc;

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
