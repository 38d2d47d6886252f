//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트는 실패 시 같은 형식의 JSON 본문을 반환합니다.
//! 도메인 에러([`TaskHubError`])의 HTTP 상태 코드 매핑도 이곳에서 수행합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskhub_core::TaskHubError;
use utoipa::ToSchema;

use crate::repository::StoreError;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "ACCESS_DENIED",
///   "message": "Access denied: Only Admin can create tasks",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DUPLICATE_EMAIL", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 상태 코드와 본문을 함께 가진 API 에러.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse::new(code, message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
    }

    pub fn not_found(entity: &str) -> Self {
        TaskHubError::not_found(entity).into()
    }
}

/// 도메인 에러 → (상태 코드, 에러 코드).
fn classify(err: &TaskHubError) -> (StatusCode, &'static str) {
    match err {
        TaskHubError::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
        TaskHubError::UserNotFound => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
        TaskHubError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        TaskHubError::AccessDenied(_) => (StatusCode::FORBIDDEN, "ACCESS_DENIED"),
        TaskHubError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        TaskHubError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        TaskHubError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        TaskHubError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl From<TaskHubError> for ApiError {
    fn from(err: TaskHubError) -> Self {
        let (status, code) = classify(&err);
        if status.is_server_error() {
            // 내부 정보는 로그에만 남김
            tracing::error!(error = %err, "요청 처리 중 내부 에러");
            return Self::new(status, code, "Internal server error");
        }
        Self::new(status, code, err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        TaskHubError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiErrorResponse::with_details("INVALID_INPUT", "Validation failed", details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
