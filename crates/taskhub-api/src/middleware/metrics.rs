//! HTTP 요청 metrics middleware.
//!
//! 모든 HTTP 요청에 대해 메트릭을 수집합니다.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// HTTP 메트릭 미들웨어.
///
/// 요청 수, 상태 코드별 응답 수, 처리 시간을 경로별로 기록합니다.
/// 태스크 ID 같은 숫자 세그먼트는 `:id`로 묶어 라벨 수를 제한합니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    record_http_request(&method, &path);

    let response = next.run(request).await;
    let status = response.status().as_u16();

    record_http_response(&method, &path, status);
    record_http_duration(&method, &path, start.elapsed().as_secs_f64());

    if status == 401 || status == 403 {
        tracing::debug!(%method, %path, status, "인증/인가 실패 응답");
    }

    response
}
