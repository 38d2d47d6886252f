//! 관리자 API 라우트.
//!
//! 모든 핸들러는 [`AdminIdentity`] 추출기로 ADMIN 역할을 확인한 뒤에만
//! 데이터에 접근합니다.
//!
//! # 엔드포인트
//!
//! - `GET /admin/users` - 사용자 목록
//! - `GET /admin/tasks` - 전체 태스크
//! - `POST /admin/tasks/assign?userId=` - 사용자에게 태스크 배정
//! - `PUT /admin/tasks/{id}` - 태스크 편집
//! - `PUT /admin/tasks/{id}/approve` - 승인
//! - `PUT /admin/tasks/{id}/reject` - 반려
//! - `DELETE /admin/tasks/{id}` - 삭제
//! - `DELETE /admin/tasks/purge-old` - 오래된 승인 태스크 정리
//! - `POST /admin/announcements` - 공지 등록
//! - `GET /admin/analytics` - 통계
//! - `POST /admin/projects`, `GET /admin/projects` - 프로젝트 관리

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use taskhub_core::{
    Announcement, NewAnnouncement, NewProject, NewTask, Project, Task, TaskAnalytics, TaskInput,
    TaskStatus, UserSummary,
};
use tracing::info;
use utoipa::IntoParams;

use super::auth::MessageResponse;
use super::tasks::ensure_project;
use crate::auth::{review, AdminIdentity};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

// ================================================================================================
// Request Types
// ================================================================================================

/// 태스크 배정 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AssignQuery {
    /// 배정 대상 사용자 ID
    pub user_id: i64,
}

/// 승인 쿼리.
///
/// `adminEmail`은 이전 클라이언트 호환을 위해 받기만 하고 사용하지 않습니다.
/// 승인자는 항상 호출자의 신원으로 기록됩니다.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ApproveQuery {
    #[serde(default)]
    pub admin_email: Option<String>,
}

// ================================================================================================
// Helpers
// ================================================================================================

async fn load_task(state: &AppState, id: i64) -> ApiResult<Task> {
    state
        .repos
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))
}

async fn save_task(state: &AppState, task: &Task) -> ApiResult<Task> {
    state
        .repos
        .tasks
        .update(task)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /admin/users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "사용자 목록", body = Vec<UserSummary>),
        (status = 401, description = "인증 필요"),
        (status = 403, description = "ADMIN 역할 필요")
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = state.repos.users.list().await?;
    Ok(Json(users.iter().map(|u| u.summary()).collect()))
}

/// GET /admin/tasks
#[utoipa::path(
    get,
    path = "/admin/tasks",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "전체 태스크", body = Vec<Task>))
)]
pub async fn list_all_tasks(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.repos.tasks.list().await?))
}

/// POST /admin/tasks/assign?userId=
#[utoipa::path(
    post,
    path = "/admin/tasks/assign",
    tag = "admin",
    params(AssignQuery),
    request_body = TaskInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "배정된 태스크", body = Task),
        (status = 404, description = "사용자 또는 프로젝트 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn assign_task(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Query(query): Query<AssignQuery>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    let user = state
        .repos
        .users
        .find_by_id(query.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    ensure_project(&state, &input).await?;

    let task = state
        .repos
        .tasks
        .insert(NewTask::pending(input, Some(user.id)))
        .await?;

    info!(task_id = task.id, user_id = user.id, admin = %identity.subject, "태스크 배정");
    Ok(Json(task))
}

/// PUT /admin/tasks/{id}
///
/// 제목, 설명, 마감일만 변경하며 상태는 유지합니다.
#[utoipa::path(
    put,
    path = "/admin/tasks/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "태스크 ID")),
    request_body = TaskInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정된 태스크", body = Task),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn edit_task(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    let mut task = load_task(&state, id).await?;
    task.title = input.title;
    task.description = input.description;
    task.due_date = input.due_date;

    let saved = save_task(&state, &task).await?;
    info!(task_id = id, admin = %identity.subject, "관리자 태스크 편집");
    Ok(Json(saved))
}

/// PUT /admin/tasks/{id}/approve
#[utoipa::path(
    put,
    path = "/admin/tasks/{id}/approve",
    tag = "admin",
    params(("id" = i64, Path, description = "태스크 ID"), ApproveQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "승인된 태스크", body = Task),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn approve_task(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<i64>,
    Query(query): Query<ApproveQuery>,
) -> ApiResult<Json<Task>> {
    if let Some(claimed) = query.admin_email.as_deref() {
        if claimed != identity.subject {
            tracing::warn!(claimed, subject = %identity.subject, "adminEmail 파라미터 무시");
        }
    }

    let mut task = load_task(&state, id).await?;
    review(&mut task, TaskStatus::Approved, &identity.subject);
    let saved = save_task(&state, &task).await?;

    info!(task_id = id, admin = %identity.subject, "태스크 승인");
    Ok(Json(saved))
}

/// PUT /admin/tasks/{id}/reject
#[utoipa::path(
    put,
    path = "/admin/tasks/{id}/reject",
    tag = "admin",
    params(("id" = i64, Path, description = "태스크 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "반려된 태스크", body = Task),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn reject_task(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let mut task = load_task(&state, id).await?;
    review(&mut task, TaskStatus::Rejected, &identity.subject);
    let saved = save_task(&state, &task).await?;

    info!(task_id = id, admin = %identity.subject, "태스크 반려");
    Ok(Json(saved))
}

/// DELETE /admin/tasks/{id}
#[utoipa::path(
    delete,
    path = "/admin/tasks/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "태스크 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 완료", body = MessageResponse),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.repos.tasks.delete(id).await? {
        return Err(ApiError::not_found("Task"));
    }

    info!(task_id = id, admin = %identity.subject, "관리자 태스크 삭제");
    Ok(Json(MessageResponse::new("Task deleted by Admin")))
}

/// DELETE /admin/tasks/purge-old
///
/// 승인 완료되고 마감일이 30일보다 지난 태스크를 삭제합니다.
#[utoipa::path(
    delete,
    path = "/admin/tasks/purge-old",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "정리 결과", body = MessageResponse))
)]
pub async fn purge_old_tasks(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
) -> ApiResult<Json<MessageResponse>> {
    let today = chrono::Utc::now().date_naive();
    let ids: Vec<i64> = state
        .repos
        .tasks
        .list()
        .await?
        .iter()
        .filter(|t| t.is_purgeable(today))
        .map(|t| t.id)
        .collect();

    let purged = state.repos.tasks.delete_many(&ids).await?;
    metrics::set_last_purge_count(purged);
    info!(purged, admin = %identity.subject, "오래된 태스크 정리");

    Ok(Json(MessageResponse::new(format!("{purged} old tasks purged."))))
}

/// POST /admin/announcements
#[utoipa::path(
    post,
    path = "/admin/announcements",
    tag = "admin",
    request_body = NewAnnouncement,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "등록된 공지", body = Announcement))
)]
pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Json(input): Json<NewAnnouncement>,
) -> ApiResult<Json<Announcement>> {
    let announcement = state
        .repos
        .announcements
        .insert(input, chrono::Utc::now())
        .await?;
    info!(announcement_id = announcement.id, admin = %identity.subject, "공지 등록");
    Ok(Json(announcement))
}

/// GET /admin/analytics
#[utoipa::path(
    get,
    path = "/admin/analytics",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "통계", body = TaskAnalytics))
)]
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
) -> ApiResult<Json<TaskAnalytics>> {
    let (total_users, tasks) = tokio::try_join!(state.repos.users.count(), state.repos.tasks.list())?;
    Ok(Json(TaskAnalytics::compute(total_users, &tasks)))
}

/// POST /admin/projects
#[utoipa::path(
    post,
    path = "/admin/projects",
    tag = "admin",
    request_body = NewProject,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "생성된 프로젝트", body = Project),
        (status = 404, description = "참여자 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Json(mut input): Json<NewProject>,
) -> ApiResult<Json<Project>> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("Project name must not be empty"));
    }

    input.normalize_members();
    for &member_id in &input.member_ids {
        state
            .repos
            .users
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;
    }

    let project = state.repos.projects.insert(input).await?;
    info!(project_id = project.id, admin = %identity.subject, "프로젝트 생성");
    Ok(Json(project))
}

/// GET /admin/projects
#[utoipa::path(
    get,
    path = "/admin/projects",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "프로젝트 목록", body = Vec<Project>))
)]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    _admin: AdminIdentity,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.repos.projects.list().await?))
}

/// 관리자 라우터 생성.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/tasks", get(list_all_tasks))
        .route("/tasks/assign", post(assign_task))
        .route("/tasks/purge-old", delete(purge_old_tasks))
        .route("/tasks/{id}", put(edit_task).delete(delete_task))
        .route("/tasks/{id}/approve", put(approve_task))
        .route("/tasks/{id}/reject", put(reject_task))
        .route("/announcements", post(create_announcement))
        .route("/analytics", get(analytics))
        .route("/projects", post(create_project).get(list_projects))
}
