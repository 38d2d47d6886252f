//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → `TASKHUB__` 접두사 환경 변수 순으로 덮어씁니다.
//!
//! ```text
//! TASKHUB__SERVER__PORT=8080
//! TASKHUB__AUTH__SUPERUSER__MODE=seeded
//! TASKHUB__AUTH__SUPERUSER__PASSWORDS=admin,Admin
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "TASKHUB";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 세션 토큰 유효 시간 상한 (1년).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 세션 토큰 유효 시간 (시간)
    pub token_ttl_hours: i64,
    /// 토큰 서명 키. 비어 있으면 프로세스 시작 시 무작위로 생성합니다.
    pub signing_secret: Option<String>,
    /// 슈퍼유저 설정
    pub superuser: SuperuserConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: 24,
            signing_secret: None,
            superuser: SuperuserConfig::default(),
        }
    }
}

/// 슈퍼유저 처리 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuperuserMode {
    /// 로그인 시 고정 비밀번호를 직접 비교 (저장소 조회 없음)
    #[default]
    Bypass,
    /// 시작 시 관리자 자격증명을 저장소에 시드하고 일반 로그인 경로를 사용
    Seeded,
}

/// 슈퍼유저 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuperuserConfig {
    /// 슈퍼유저 이메일
    pub email: String,
    /// 허용 비밀번호 목록. `seeded` 모드에서는 첫 번째 값이 시드됩니다.
    pub passwords: Vec<String>,
    /// 표시 이름
    pub name: String,
    /// 처리 방식
    pub mode: SuperuserMode,
}

impl Default for SuperuserConfig {
    fn default() -> Self {
        Self {
            email: "admin@jobhook.com".to_string(),
            passwords: vec!["admin".to_string(), "Admin".to_string()],
            name: "Admin".to_string(),
            mode: SuperuserMode::Bypass,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL. 없으면 인메모리 저장소를 사용합니다.
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 출력 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "taskhub_api=info,taskhub_core=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아니며, 기본값과 환경 변수만으로 구성됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth.superuser.passwords"),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.token_ttl_hours <= 0 {
            return Err(config::ConfigError::Message(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }
        if self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(config::ConfigError::Message(format!(
                "auth.token_ttl_hours must not exceed {MAX_TOKEN_TTL_HOURS}"
            )));
        }
        if self.auth.superuser.email.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "auth.superuser.email must not be empty".to_string(),
            ));
        }
        if self.auth.superuser.passwords.iter().all(|p| p.is_empty()) {
            return Err(config::ConfigError::Message(
                "auth.superuser.passwords must contain a non-empty password".to_string(),
            ));
        }
        if matches!(&self.auth.signing_secret, Some(s) if s.len() < 32) {
            return Err(config::ConfigError::Message(
                "auth.signing_secret must be at least 32 bytes".to_string(),
            ));
        }
        Ok(())
    }
}
