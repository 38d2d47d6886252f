//! 태스크 인가 정책.
//!
//! 모든 판정은 순수 함수이며 저장소에 접근하지 않습니다.
//! 호출자는 판정이 성공한 뒤에만 데이터를 변경해야 합니다.

use taskhub_core::{
    Role, SuperuserConfig, Task, TaskHubError, TaskHubResult, TaskInput, TaskStatus,
};

use super::middleware::RequestIdentity;

/// 태스크 접근 정책.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    superuser_email: String,
}

impl AccessPolicy {
    pub fn new(superuser_email: impl Into<String>) -> Self {
        Self {
            superuser_email: superuser_email.into(),
        }
    }

    pub fn from_config(superuser: &SuperuserConfig) -> Self {
        Self::new(superuser.email.clone())
    }

    pub fn superuser_email(&self) -> &str {
        &self.superuser_email
    }

    /// 슈퍼유저 신원인지 확인. 이메일과 ADMIN 역할이 모두 일치해야 합니다.
    pub fn is_superuser(&self, identity: &RequestIdentity) -> bool {
        identity.role == Role::Admin && identity.subject == self.superuser_email
    }

    /// 태스크 생성은 슈퍼유저만 가능.
    pub fn authorize_task_create(&self, identity: &RequestIdentity) -> TaskHubResult<()> {
        if self.is_superuser(identity) {
            Ok(())
        } else {
            Err(TaskHubError::access_denied("Only Admin can create tasks"))
        }
    }

    /// 태스크 수정.
    ///
    /// 현재 상태가 SUBMITTED/APPROVED인 태스크는 슈퍼유저만 수정할 수 있고,
    /// 일반 사용자는 APPROVED/REJECTED로 상태를 바꿀 수 없습니다.
    pub fn authorize_task_update(
        &self,
        identity: &RequestIdentity,
        current: &Task,
        input: &TaskInput,
    ) -> TaskHubResult<()> {
        if self.is_superuser(identity) {
            return Ok(());
        }

        if current.status.is_locked() {
            return Err(TaskHubError::access_denied(
                "Submitted or Approved tasks are locked and cannot be modified.",
            ));
        }

        if input.status.is_some_and(|s| s.is_review_outcome()) {
            return Err(TaskHubError::access_denied(
                "Only Admin can approve or reject tasks",
            ));
        }

        Ok(())
    }

    /// 태스크 삭제는 슈퍼유저만 가능.
    pub fn authorize_task_delete(&self, identity: &RequestIdentity) -> TaskHubResult<()> {
        if self.is_superuser(identity) {
            Ok(())
        } else {
            Err(TaskHubError::access_denied("Only Admin can delete tasks"))
        }
    }
}

/// 상태 전이 시 승인자 기록 규칙.
///
/// 승인 시 승인자를 기록하고, 그 밖의 상태로 바뀌면 지웁니다.
pub fn review(task: &mut Task, outcome: TaskStatus, reviewer: &str) {
    task.status = outcome;
    task.approved_by = match outcome {
        TaskStatus::Approved => Some(reviewer.to_string()),
        _ => None,
    };
}

/// 수정 요청을 반영합니다. 상태가 바뀌면 [`review`] 규칙으로 승인자를 갱신합니다.
///
/// 상태가 그대로면 기존 승인자를 유지합니다.
pub fn apply_update(task: &mut Task, input: &TaskInput, editor: &str) {
    let previous = task.status;
    task.apply(input);
    if task.status != previous {
        review(task, task.status, editor);
    }
}
