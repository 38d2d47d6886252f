//! 사용자 자격증명 모델.

use serde::{Deserialize, Serialize};

use super::Role;

/// 로컬 가입 사용자의 provider 값.
pub const LOCAL_PROVIDER: &str = "LOCAL";

/// 저장소에 보관되는 사용자 자격증명.
///
/// `password_hash`는 PHC 형식 해시이며, 외부로 직렬화되지 않도록
/// API 응답에는 [`UserSummary`]를 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub provider: String,
    pub enabled: bool,
}

impl UserRecord {
    /// 비밀번호 해시를 제외한 요약 정보.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            provider: self.provider.clone(),
            enabled: self.enabled,
        }
    }
}

/// 신규 사용자 입력 (id는 저장소가 부여).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub provider: String,
    pub enabled: bool,
}

impl NewUser {
    /// 로컬 가입 일반 사용자.
    pub fn local(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash,
            role: Role::User,
            provider: LOCAL_PROVIDER.to_string(),
            enabled: true,
        }
    }
}

/// 사용자 요약 (목록 API 응답용).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub provider: String,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_user_defaults() {
        let user = NewUser::local("Alice", "alice@x.com", "hash".to_string());
        assert_eq!(user.role, Role::User);
        assert_eq!(user.provider, "LOCAL");
        assert!(user.enabled);
    }

    #[test]
    fn test_summary_hides_password_hash() {
        let record = UserRecord {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::User,
            provider: LOCAL_PROVIDER.to_string(),
            enabled: true,
        };

        let json = serde_json::to_string(&record.summary()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains(r#""email":"alice@x.com""#));
        assert!(json.contains(r#""role":"USER""#));
    }
}
