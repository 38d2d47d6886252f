//! 비밀번호 해싱.
//!
//! 인증기는 해시 알고리즘을 단방향 `hash`/`verify` 쌍으로만 다룹니다.
//! 기본 구현은 Argon2id입니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 단방향 비밀번호 해시 함수.
pub trait CredentialHasher: Send + Sync {
    /// 평문 비밀번호를 저장용 해시로 변환합니다.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// 평문이 저장된 해시와 일치하는지 확인합니다.
    ///
    /// 해시 형식이 손상된 경우에도 `false`를 반환합니다.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id 기반 해시 구현.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordError::HashingFailed)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match parse_hash(hash) {
            Ok(parsed) => self.argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "저장된 비밀번호 해시를 해석할 수 없습니다");
                false
            }
        }
    }
}

fn parse_hash(hash: &str) -> Result<PasswordHash<'_>, PasswordError> {
    PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hasher = Argon2Hasher::default();
        let hash = hasher.hash("pw123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw123", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = Argon2Hasher::default();
        let first = hasher.hash("Password1").unwrap();
        let second = hasher.hash("Password1").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Password1", &first));
        assert!(hasher.verify("Password1", &second));
    }

    #[test]
    fn test_corrupt_hash_does_not_verify() {
        let hasher = Argon2Hasher::default();
        assert!(!hasher.verify("password", "not-a-valid-hash"));
        assert!(matches!(parse_hash("plain"), Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_unicode_password() {
        let hasher = Argon2Hasher::default();
        let hash = hasher.hash("한글패스워드123").unwrap();
        assert!(hasher.verify("한글패스워드123", &hash));
    }
}
