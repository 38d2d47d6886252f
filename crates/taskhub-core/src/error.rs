//! 태스크 관리 시스템의 에러 타입.
//!
//! 인증/인가 실패와 데이터 접근 실패를 하나의 분류 체계로 표현합니다.
//! HTTP 상태 코드 매핑은 API 계층에서 수행합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum TaskHubError {
    /// 이미 가입된 이메일
    #[error("Email already registered")]
    DuplicateEmail,

    /// 로그인 대상 사용자가 없음
    #[error("User not found")]
    UserNotFound,

    /// 비밀번호 불일치 또는 비활성 계정
    #[error("Invalid password")]
    InvalidCredentials,

    /// 권한 부족
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// ID로 찾을 수 없는 엔티티
    #[error("{0} not found")]
    NotFound(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type TaskHubResult<T> = Result<T, TaskHubError>;

impl TaskHubError {
    /// 접근 거부 에러 생성.
    pub fn access_denied(reason: impl Into<String>) -> Self {
        TaskHubError::AccessDenied(reason.into())
    }

    /// 엔티티 미존재 에러 생성 (예: `not_found("Task")`).
    pub fn not_found(entity: impl Into<String>) -> Self {
        TaskHubError::NotFound(entity.into())
    }

    /// 인증 단계(가입/로그인)에서 발생한 에러인지 확인합니다.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            TaskHubError::DuplicateEmail
                | TaskHubError::UserNotFound
                | TaskHubError::InvalidCredentials
        )
    }

    /// 클라이언트 요청에 원인이 있는 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TaskHubError::Storage(_) | TaskHubError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(TaskHubError::DuplicateEmail.to_string(), "Email already registered");
        assert_eq!(
            TaskHubError::access_denied("Only Admin can create tasks").to_string(),
            "Access denied: Only Admin can create tasks"
        );
        assert_eq!(TaskHubError::not_found("Task").to_string(), "Task not found");
    }

    #[test]
    fn test_error_classification() {
        assert!(TaskHubError::InvalidCredentials.is_authentication_failure());
        assert!(!TaskHubError::access_denied("x").is_authentication_failure());

        assert!(TaskHubError::not_found("Task").is_client_error());
        assert!(!TaskHubError::Storage("connection reset".to_string()).is_client_error());
    }
}
