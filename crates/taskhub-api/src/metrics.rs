//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증/태스크 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 인증 메트릭 헬퍼 함수
// ============================================================================

/// 로그인 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Superuser,
    UserNotFound,
    InvalidCredentials,
}

impl LoginOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginOutcome::Success => "success",
            LoginOutcome::Superuser => "superuser",
            LoginOutcome::UserNotFound => "user_not_found",
            LoginOutcome::InvalidCredentials => "invalid_credentials",
        }
    }
}

/// 로그인 시도 카운터 증가.
pub fn record_login(outcome: LoginOutcome) {
    counter!("auth_logins_total", "outcome" => outcome.as_str()).increment(1);
}

/// 가입 카운터 증가.
pub fn record_registration(accepted: bool) {
    let result = if accepted { "accepted" } else { "duplicate" };
    counter!("auth_registrations_total", "result" => result).increment(1);
}

/// 발급 토큰 카운터 증가.
pub fn record_token_issued(role: &str) {
    counter!("auth_tokens_issued_total", "role" => role.to_string()).increment(1);
}

/// 인가 거부 카운터 증가.
pub fn record_access_denied(operation: &'static str) {
    counter!("authz_denied_total", "operation" => operation).increment(1);
}

/// 정리 작업으로 삭제된 태스크 수 기록.
pub fn set_last_purge_count(count: u64) {
    gauge!("tasks_last_purge_count").set(count as f64);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 예: `/tasks/42/approve` → `/tasks/:id/approve`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());
            if is_numeric {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
