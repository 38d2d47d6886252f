//! 인증 및 권한 부여.
//!
//! 세션 토큰 기반 인증과 태스크 접근 정책을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenCodec`]: HS256 세션 토큰 발급/검증
//! - [`CredentialHasher`]: 비밀번호 해싱 (기본 Argon2id)
//! - [`Authenticator`]: 가입/로그인
//! - [`identity_interceptor`]: 요청 신원 주입 미들웨어
//! - [`CurrentIdentity`], [`MaybeIdentity`], [`AdminIdentity`]: 핸들러용 추출기
//! - [`AccessPolicy`]: 태스크 생성/수정/삭제 인가
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     CurrentIdentity(identity): CurrentIdentity,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", identity.subject)
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod policy;
mod service;

pub use jwt::{Claims, SigningSecret, TokenCodec, TokenError, DEFAULT_TOKEN_TTL_HOURS};
pub use middleware::{
    bearer_token, identity_interceptor, AdminIdentity, CurrentIdentity, IdentityRejection,
    MaybeIdentity, RequestIdentity,
};
pub use password::{Argon2Hasher, CredentialHasher, PasswordError};
pub use policy::{apply_update, review, AccessPolicy};
pub use service::{
    Authenticator, LoginRequest, LoginResponse, RegisterRequest, OTP_SENT_MESSAGE,
    REGISTERED_MESSAGE,
};
