//! 태스크 API 라우트.
//!
//! 조회는 익명으로 가능하고, 변경은 인증된 신원과 접근 정책을 요구합니다.
//!
//! # 엔드포인트
//!
//! - `GET /tasks` - 태스크 목록
//! - `GET /tasks/{id}` - 태스크 상세
//! - `GET /tasks/announcements` - 공지사항 목록
//! - `POST /tasks` - 태스크 생성 (슈퍼유저)
//! - `PUT /tasks/{id}` - 태스크 수정
//! - `DELETE /tasks/{id}` - 태스크 삭제 (슈퍼유저)

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use taskhub_core::{Announcement, NewTask, Task, TaskInput};
use tracing::{debug, info};

use super::auth::MessageResponse;
use crate::auth::{apply_update, CurrentIdentity, MaybeIdentity};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// 태스크 삭제 응답 메시지.
pub const TASK_DELETED_MESSAGE: &str = "Task deleted";

/// 입력에 프로젝트가 지정되어 있으면 존재하는지 확인합니다.
pub(crate) async fn ensure_project(state: &AppState, input: &TaskInput) -> ApiResult<()> {
    if let Some(project_id) = input.project_id {
        if !state.repos.projects.exists(project_id).await? {
            return Err(ApiError::not_found("Project"));
        }
    }
    Ok(())
}

/// GET /tasks
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses((status = 200, description = "태스크 목록", body = Vec<Task>))
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
) -> ApiResult<Json<Vec<Task>>> {
    debug!(subject = identity.as_ref().map(|i| i.subject.as_str()), "태스크 목록 조회");
    Ok(Json(state.repos.tasks.list().await?))
}

/// GET /tasks/{id}
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "태스크 ID")),
    responses(
        (status = 200, description = "태스크 상세", body = Task),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    state
        .repos
        .tasks
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task"))
}

/// GET /tasks/announcements
#[utoipa::path(
    get,
    path = "/tasks/announcements",
    tag = "tasks",
    responses((status = 200, description = "공지사항 목록", body = Vec<Announcement>))
)]
pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Announcement>>> {
    Ok(Json(state.repos.announcements.list().await?))
}

/// POST /tasks
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = TaskInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "생성된 태스크", body = Task),
        (status = 401, description = "인증 필요", body = crate::error::ApiErrorResponse),
        (status = 403, description = "슈퍼유저만 생성 가능", body = crate::error::ApiErrorResponse),
        (status = 404, description = "프로젝트 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    if let Err(e) = state.policy.authorize_task_create(&identity) {
        metrics::record_access_denied("task_create");
        return Err(e.into());
    }

    ensure_project(&state, &input).await?;
    let task = state.repos.tasks.insert(NewTask::pending(input, None)).await?;
    info!(task_id = task.id, subject = %identity.subject, "태스크 생성");
    Ok(Json(task))
}

/// PUT /tasks/{id}
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "태스크 ID")),
    request_body = TaskInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정된 태스크", body = Task),
        (status = 401, description = "인증 필요", body = crate::error::ApiErrorResponse),
        (status = 403, description = "잠긴 태스크", body = crate::error::ApiErrorResponse),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<Task>> {
    let mut task = state
        .repos
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    if let Err(e) = state.policy.authorize_task_update(&identity, &task, &input) {
        metrics::record_access_denied("task_update");
        return Err(e.into());
    }

    let previous = task.status;
    apply_update(&mut task, &input, &identity.subject);

    let saved = state
        .repos
        .tasks
        .update(&task)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    info!(
        task_id = id,
        subject = %identity.subject,
        from = %previous,
        to = %saved.status,
        "태스크 수정"
    );
    Ok(Json(saved))
}

/// DELETE /tasks/{id}
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "태스크 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 완료", body = MessageResponse),
        (status = 401, description = "인증 필요", body = crate::error::ApiErrorResponse),
        (status = 403, description = "슈퍼유저만 삭제 가능", body = crate::error::ApiErrorResponse),
        (status = 404, description = "태스크 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if let Err(e) = state.policy.authorize_task_delete(&identity) {
        metrics::record_access_denied("task_delete");
        return Err(e.into());
    }

    if !state.repos.tasks.delete(id).await? {
        return Err(ApiError::not_found("Task"));
    }

    info!(task_id = id, subject = %identity.subject, "태스크 삭제");
    Ok(Json(MessageResponse::new(TASK_DELETED_MESSAGE)))
}

/// 태스크 라우터 생성.
pub fn tasks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/announcements", get(list_announcements))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
}
