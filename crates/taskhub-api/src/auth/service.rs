//! 인증 서비스.
//!
//! 가입, 로그인, OTP 요청(스텁)을 처리합니다. 비밀번호 해싱은 CPU를 많이
//! 쓰므로 `spawn_blocking`으로 별도 스레드 풀에서 실행합니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taskhub_core::{
    NewUser, Role, SuperuserConfig, SuperuserMode, TaskHubError, TaskHubResult, UserRecord,
};
use utoipa::ToSchema;
use validator::Validate;

use super::jwt::TokenCodec;
use super::password::CredentialHasher;
use crate::metrics::{self, LoginOutcome};
use crate::repository::{CredentialStore, StoreError};

/// 가입 성공 메시지.
pub const REGISTERED_MESSAGE: &str = "User Registered Successfully";

/// OTP 요청 응답 메시지.
pub const OTP_SENT_MESSAGE: &str = "OTP sent to email";

/// 가입 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "이름은 비어 있을 수 없습니다"))]
    pub name: String,
    #[validate(email(message = "올바른 이메일 형식이 아닙니다"))]
    pub email: String,
    #[validate(length(min = 1, message = "비밀번호는 비어 있을 수 없습니다"))]
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub name: String,
    pub email: String,
}

/// 인증기.
///
/// 자격증명 저장소, 토큰 코덱, 해시 함수를 주입받아 동작합니다.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    hasher: Arc<dyn CredentialHasher>,
    superuser: SuperuserConfig,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        codec: Arc<TokenCodec>,
        hasher: Arc<dyn CredentialHasher>,
        superuser: SuperuserConfig,
    ) -> Self {
        Self {
            users,
            codec,
            hasher,
            superuser,
        }
    }

    /// 새 사용자 가입.
    ///
    /// 슈퍼유저 이메일을 포함해 이미 존재하는 이메일이면 `DuplicateEmail`.
    pub async fn register(&self, request: RegisterRequest) -> TaskHubResult<&'static str> {
        if request.email == self.superuser.email
            || self.users.find_by_email(&request.email).await?.is_some()
        {
            metrics::record_registration(false);
            return Err(TaskHubError::DuplicateEmail);
        }

        let hash = self.hash_password(request.password).await?;
        let user = NewUser::local(request.name, request.email, hash);

        match self.users.insert(user).await {
            Ok(record) => {
                tracing::info!(user_id = record.id, email = %record.email, "사용자 가입");
                metrics::record_registration(true);
                Ok(REGISTERED_MESSAGE)
            }
            // 동시 가입 경쟁에서 진 경우
            Err(StoreError::Duplicate(_)) => {
                metrics::record_registration(false);
                Err(TaskHubError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 로그인.
    pub async fn login(&self, request: LoginRequest) -> TaskHubResult<LoginResponse> {
        if self.is_superuser_bypass(&request) {
            tracing::info!(email = %request.email, "슈퍼유저 로그인");
            metrics::record_login(LoginOutcome::Superuser);
            return self.respond(self.superuser.email.clone(), self.superuser.name.clone(), Role::Admin);
        }

        let Some(user) = self.users.find_by_email(&request.email).await? else {
            tracing::debug!(email = %request.email, "로그인 실패: 사용자 없음");
            metrics::record_login(LoginOutcome::UserNotFound);
            return Err(TaskHubError::UserNotFound);
        };

        if !self.verify_password(request.password, &user).await? || !user.enabled {
            tracing::debug!(email = %request.email, enabled = user.enabled, "로그인 실패");
            metrics::record_login(LoginOutcome::InvalidCredentials);
            return Err(TaskHubError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, role = %user.role, "로그인 성공");
        metrics::record_login(LoginOutcome::Success);
        self.respond(user.email, user.name, user.role)
    }

    /// 비밀번호 재설정 OTP 요청. 실제 발송은 하지 않습니다.
    pub fn send_otp(&self, email: &str) -> &'static str {
        tracing::debug!(%email, "OTP 요청 (발송 없음)");
        OTP_SENT_MESSAGE
    }

    /// `seeded` 모드에서 슈퍼유저 자격증명을 저장소에 넣습니다.
    ///
    /// 이미 있으면 아무것도 하지 않으며, 새로 만든 경우 `true`.
    pub async fn seed_superuser(&self) -> TaskHubResult<bool> {
        if self.superuser.mode != SuperuserMode::Seeded {
            return Ok(false);
        }
        if self.users.find_by_email(&self.superuser.email).await?.is_some() {
            return Ok(false);
        }

        let password = self
            .superuser
            .passwords
            .iter()
            .find(|p| !p.is_empty())
            .cloned()
            .ok_or_else(|| TaskHubError::Internal("슈퍼유저 비밀번호가 없습니다".to_string()))?;

        let hash = self.hash_password(password).await?;
        let mut user = NewUser::local(self.superuser.name.clone(), self.superuser.email.clone(), hash);
        user.role = Role::Admin;

        match self.users.insert(user).await {
            Ok(record) => {
                tracing::info!(user_id = record.id, email = %record.email, "슈퍼유저 시드 완료");
                Ok(true)
            }
            Err(StoreError::Duplicate(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn is_superuser_bypass(&self, request: &LoginRequest) -> bool {
        self.superuser.mode == SuperuserMode::Bypass
            && request.email == self.superuser.email
            && self.superuser.passwords.iter().any(|p| !p.is_empty() && *p == request.password)
    }

    fn respond(&self, email: String, name: String, role: Role) -> TaskHubResult<LoginResponse> {
        let token = self
            .codec
            .issue(&email, role)
            .map_err(|e| TaskHubError::Internal(e.to_string()))?;
        metrics::record_token_issued(role.as_str());

        Ok(LoginResponse {
            token,
            role,
            name,
            email,
        })
    }

    async fn hash_password(&self, password: String) -> TaskHubResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| TaskHubError::Internal(format!("해싱 태스크 실패: {e}")))?
            .map_err(|e| TaskHubError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: String, user: &UserRecord) -> TaskHubResult<bool> {
        let hasher = self.hasher.clone();
        let hash = user.password_hash.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| TaskHubError::Internal(format!("검증 태스크 실패: {e}")))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("superuser_email", &self.superuser.email)
            .field("superuser_mode", &self.superuser.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::SigningSecret;
    use crate::auth::password::Argon2Hasher;
    use crate::repository::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        codec: Arc<TokenCodec>,
        auth: Authenticator,
    }

    fn fixture(mode: SuperuserMode) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let codec = Arc::new(TokenCodec::with_default_ttl(&SigningSecret::generate()));
        let superuser = SuperuserConfig {
            mode,
            ..Default::default()
        };
        let auth = Authenticator::new(
            store.clone(),
            codec.clone(),
            Arc::new(Argon2Hasher::default()),
            superuser,
        );
        Fixture { store, codec, auth }
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let f = fixture(SuperuserMode::Bypass);
        let message = f
            .auth
            .register(register_request("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();
        assert_eq!(message, "User Registered Successfully");

        let response = f.auth.login(login_request("alice@x.com", "pw123")).await.unwrap();
        assert_eq!(response.role, Role::User);
        assert_eq!(response.email, "alice@x.com");
        assert_eq!(response.name, "Alice");

        let claims = f.codec.validate(&response.token).unwrap();
        assert_eq!(claims.sub, "alice@x.com");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_stored_password_is_hashed() {
        let f = fixture(SuperuserMode::Bypass);
        f.auth
            .register(register_request("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let stored = f.store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw123");
        assert_eq!(stored.provider, "LOCAL");
        assert!(stored.enabled);
    }

    #[tokio::test]
    async fn test_duplicate_register() {
        let f = fixture(SuperuserMode::Bypass);
        f.auth
            .register(register_request("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let err = f
            .auth
            .register(register_request("Alice 2", "alice@x.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskHubError::DuplicateEmail));
        assert_eq!(CredentialStore::count(f.store.as_ref()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_superuser_email_cannot_be_registered() {
        let f = fixture(SuperuserMode::Bypass);
        let err = f
            .auth
            .register(register_request("Mallory", "admin@jobhook.com", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskHubError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_login_failures() {
        let f = fixture(SuperuserMode::Bypass);
        f.auth
            .register(register_request("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let err = f.auth.login(login_request("alice@x.com", "wrong")).await.unwrap_err();
        assert!(matches!(err, TaskHubError::InvalidCredentials));

        let err = f.auth.login(login_request("nobody@x.com", "pw")).await.unwrap_err();
        assert!(matches!(err, TaskHubError::UserNotFound));
    }

    #[tokio::test]
    async fn test_disabled_account_rejected() {
        let f = fixture(SuperuserMode::Bypass);
        let hash = Argon2Hasher::default().hash("pw").unwrap();
        let mut user = NewUser::local("Bob", "bob@x.com", hash);
        user.enabled = false;
        CredentialStore::insert(f.store.as_ref(), user).await.unwrap();

        let err = f.auth.login(login_request("bob@x.com", "pw")).await.unwrap_err();
        assert!(matches!(err, TaskHubError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_superuser_bypass_ignores_store() {
        let f = fixture(SuperuserMode::Bypass);
        for password in ["admin", "Admin"] {
            let response = f
                .auth
                .login(login_request("admin@jobhook.com", password))
                .await
                .unwrap();
            assert_eq!(response.role, Role::Admin);
            let claims = f.codec.validate(&response.token).unwrap();
            assert_eq!(claims.role, Role::Admin);
        }
        assert_eq!(CredentialStore::count(f.store.as_ref()).await.unwrap(), 0);

        // 다른 비밀번호는 일반 경로를 탐
        let err = f
            .auth
            .login(login_request("admin@jobhook.com", "ADMIN"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskHubError::UserNotFound));
    }

    #[tokio::test]
    async fn test_seeded_mode_uses_store() {
        let f = fixture(SuperuserMode::Seeded);

        // 시드 전에는 우회 경로가 없음
        let err = f
            .auth
            .login(login_request("admin@jobhook.com", "admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskHubError::UserNotFound));

        assert!(f.auth.seed_superuser().await.unwrap());
        assert!(!f.auth.seed_superuser().await.unwrap());

        let response = f
            .auth
            .login(login_request("admin@jobhook.com", "admin"))
            .await
            .unwrap();
        assert_eq!(response.role, Role::Admin);

        // 시드된 것은 첫 번째 비밀번호뿐
        let err = f
            .auth
            .login(login_request("admin@jobhook.com", "Admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskHubError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_bypass_mode_does_not_seed() {
        let f = fixture(SuperuserMode::Bypass);
        assert!(!f.auth.seed_superuser().await.unwrap());
        assert_eq!(CredentialStore::count(f.store.as_ref()).await.unwrap(), 0);
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register_request("Alice", "alice@x.com", "pw").validate().is_ok());
        assert!(register_request("", "alice@x.com", "pw").validate().is_err());
        assert!(register_request("Alice", "not-an-email", "pw").validate().is_err());
        assert!(register_request("Alice", "alice@x.com", "").validate().is_err());
    }

    #[tokio::test]
    async fn test_unrepresentable_expiry_fails_login_without_panic() {
        let codec = Arc::new(TokenCodec::new(
            &SigningSecret::generate(),
            chrono::Duration::hours(10_000_000_000),
        ));
        let auth = Authenticator::new(
            Arc::new(MemoryStore::new()),
            codec,
            Arc::new(Argon2Hasher::default()),
            SuperuserConfig::default(),
        );

        let err = auth
            .login(login_request("admin@jobhook.com", "admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskHubError::Internal(_)));
    }

    #[test]
    fn test_send_otp_is_fixed_message() {
        let f = fixture(SuperuserMode::Bypass);
        assert_eq!(f.auth.send_otp("alice@x.com"), "OTP sent to email");
    }
}
