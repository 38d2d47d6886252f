//! 세션 토큰 처리.
//!
//! HS256으로 서명된 JWT를 발급/검증합니다. 서명 키는 프로세스 시작 시
//! 한 번 만들어져 [`TokenCodec`]에 주입되며, 이후 읽기 전용입니다.
//! 서버 측 세션 저장소나 폐기 목록은 없으므로 토큰의 유효성은
//! 서명과 만료 시각만으로 결정됩니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use taskhub_core::Role;

/// 기본 토큰 유효 시간 (시간).
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// 무작위 생성 서명 키 길이 (바이트).
const GENERATED_SECRET_LEN: usize = 32;

/// 세션 토큰 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 이메일
    pub sub: String,
    /// 발급 시점의 사용자 역할
    pub role: Role,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// `issued_at` 기준으로 `ttl` 동안 유효한 Claims 생성.
    ///
    /// 만료 시각이 표현 범위를 넘으면 [`TokenError::ExpiryOutOfRange`].
    pub fn new(
        subject: impl Into<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        Ok(Self {
            sub: subject.into(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        })
    }

    /// `now` 시점에 만료되었는지 확인. 만료 시각 당일 초까지는 유효합니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// 토큰 처리 에러.
///
/// 검증 실패는 [`TokenCodec::validate`]에서 `None`으로 흡수되며,
/// 호출자에게 에러로 전파되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("유효하지 않은 토큰")]
    Invalid,
    #[error("토큰 만료 시각이 표현 범위를 벗어났습니다")]
    ExpiryOutOfRange,
}

/// 토큰 서명 키.
///
/// `Debug` 출력에 키 내용을 노출하지 않습니다.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// OS 난수 생성기로 새 키를 만듭니다.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; GENERATED_SECRET_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// 설정된 키가 있으면 사용하고, 없으면 새로 생성합니다.
    pub fn from_config(configured: Option<&str>) -> Self {
        match configured {
            Some(secret) if !secret.is_empty() => Self::from_bytes(secret.as_bytes()),
            _ => Self::generate(),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret([REDACTED; {}])", self.0.len())
    }
}

/// 세션 토큰 코덱.
///
/// 발급(`issue`)과 검증(`validate`)을 담당합니다. 모든 요청이 같은
/// 인스턴스를 `Arc`로 공유하며 내부 상태는 변경되지 않습니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 validate_at에서 leeway 없이 직접 확인
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// 기본 유효 시간(24시간)으로 생성.
    pub fn with_default_ttl(secret: &SigningSecret) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 현재 시각 기준으로 토큰을 발급합니다.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// 지정한 시각을 발급 시각으로 하여 토큰을 발급합니다.
    pub fn issue_at(&self, subject: &str, role: Role, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role, issued_at, self.ttl)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(TokenError::from)
    }

    /// 서명과 만료를 확인하고 Claims를 반환합니다.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }

    /// 토큰 검증. 형식 오류, 서명 불일치, 변조, 만료 모두 `None`입니다.
    pub fn validate(&self, token: &str) -> Option<Claims> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        match self.decode_at(token, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "토큰 검증 실패");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
