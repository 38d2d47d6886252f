//! 태스크 도메인 모델.
//!
//! 상태 전이: `PENDING → SUBMITTED → {APPROVED, REJECTED}`.
//! 잠금 규칙과 같은 권한 판단은 API 계층의 정책 모듈이 담당하고,
//! 이 모듈은 상태 값 자체의 성질만 정의합니다.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 오래된 승인 태스크 정리 기준 (일).
pub const PURGE_AGE_DAYS: i64 = 30;

/// 태스크 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// 생성/배정 직후
    #[default]
    Pending,
    /// 사용자가 제출함 (검토 대기)
    Submitted,
    /// 관리자 승인
    Approved,
    /// 관리자 반려
    Rejected,
}

impl TaskStatus {
    /// 일반 사용자가 수정할 수 없는 상태인지 확인.
    pub fn is_locked(&self) -> bool {
        matches!(self, TaskStatus::Submitted | TaskStatus::Approved)
    }

    /// 관리자 검토 결과 상태인지 확인.
    pub fn is_review_outcome(&self) -> bool {
        matches!(self, TaskStatus::Approved | TaskStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Submitted => "SUBMITTED",
            TaskStatus::Approved => "APPROVED",
            TaskStatus::Rejected => "REJECTED",
        }
    }

    /// 문자열에서 상태 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(TaskStatus::Pending),
            "SUBMITTED" => Some(TaskStatus::Submitted),
            "APPROVED" => Some(TaskStatus::Approved),
            "REJECTED" => Some(TaskStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 저장된 태스크.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// 승인한 관리자 이메일
    #[serde(default)]
    pub approved_by: Option<String>,
    /// 배정된 사용자 ID
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub project_id: Option<i64>,
}

impl Task {
    /// 요청 본문의 편집 가능한 필드를 반영합니다.
    ///
    /// 상태가 지정되지 않으면 기존 상태를 유지합니다.
    pub fn apply(&mut self, input: &TaskInput) {
        self.title = input.title.clone();
        self.description = input.description.clone();
        self.due_date = input.due_date;
        if let Some(status) = input.status {
            self.status = status;
        }
    }

    /// `today` 기준으로 정리 대상인지 확인.
    ///
    /// 승인 완료되었고 마감일이 30일보다 이전인 태스크만 해당됩니다.
    pub fn is_purgeable(&self, today: NaiveDate) -> bool {
        let cutoff = today - Duration::days(PURGE_AGE_DAYS);
        self.status == TaskStatus::Approved && self.due_date.is_some_and(|due| due < cutoff)
    }
}

/// 태스크 생성/수정 입력.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub project_id: Option<i64>,
}

/// 신규 태스크 (id는 저장소가 부여).
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub user_id: Option<i64>,
    pub project_id: Option<i64>,
}

impl NewTask {
    /// 입력으로부터 PENDING 상태의 새 태스크를 만듭니다.
    pub fn pending(input: TaskInput, user_id: Option<i64>) -> Self {
        Self {
            title: input.title,
            description: input.description,
            status: TaskStatus::Pending,
            due_date: input.due_date,
            user_id,
            project_id: input.project_id,
        }
    }
}

/// 관리자 대시보드 통계.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalytics {
    pub total_users: u64,
    pub total_tasks: u64,
    /// 승인 완료된 태스크 수
    pub completed_tasks: u64,
    /// 승인되지 않은 나머지 태스크 수
    pub pending_tasks: u64,
}

impl TaskAnalytics {
    pub fn compute(total_users: u64, tasks: &[Task]) -> Self {
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Approved)
            .count() as u64;
        let total = tasks.len() as u64;

        Self {
            total_users,
            total_tasks: total,
            completed_tasks: completed,
            pending_tasks: total - completed,
        }
    }
}
