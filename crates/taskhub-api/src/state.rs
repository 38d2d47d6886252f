//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 여러 요청 간에 공유됩니다.
//! 서명 키와 정책은 시작 시 한 번 구성되며 이후 변경되지 않습니다.

use std::sync::Arc;

use chrono::Duration;
use taskhub_core::AppConfig;

use crate::auth::{AccessPolicy, Argon2Hasher, Authenticator, SigningSecret, TokenCodec};
use crate::repository::Repositories;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 로드된 설정
    pub config: Arc<AppConfig>,

    /// 저장소 묶음
    pub repos: Repositories,

    /// 세션 토큰 코덱 (인터셉터와 인증기가 공유)
    pub token_codec: Arc<TokenCodec>,

    /// 가입/로그인 서비스
    pub authenticator: Arc<Authenticator>,

    /// 태스크 인가 정책
    pub policy: AccessPolicy,

    /// 데이터베이스 연결 풀 (없으면 인메모리 저장소)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 설정과 저장소로 상태를 구성합니다.
    pub fn new(config: AppConfig, repos: Repositories, db_pool: Option<sqlx::PgPool>) -> Self {
        let secret = SigningSecret::from_config(config.auth.signing_secret.as_deref());
        if config.auth.signing_secret.is_none() {
            tracing::info!("서명 키가 설정되지 않아 무작위로 생성했습니다. 재시작 시 기존 토큰은 무효화됩니다");
        }

        let token_codec = Arc::new(TokenCodec::new(
            &secret,
            Duration::hours(config.auth.token_ttl_hours),
        ));
        let authenticator = Arc::new(Authenticator::new(
            repos.users.clone(),
            token_codec.clone(),
            Arc::new(Argon2Hasher::default()),
            config.auth.superuser.clone(),
        ));
        let policy = AccessPolicy::from_config(&config.auth.superuser);

        Self {
            config: Arc::new(config),
            repos,
            token_codec,
            authenticator,
            policy,
            db_pool,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 인메모리 저장소를 사용하는 상태.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Repositories::in_memory(), None)
    }

    /// PostgreSQL 저장소를 사용하는 상태.
    pub fn with_postgres(config: AppConfig, pool: sqlx::PgPool) -> Self {
        Self::new(config, Repositories::postgres(pool.clone()), Some(pool))
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인. 인메모리 모드에서는 `None`.
    pub async fn is_db_healthy(&self) -> Option<bool> {
        match &self.db_pool {
            Some(pool) => Some(sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()),
            None => None,
        }
    }
}
