//! 사용자 역할.
//!
//! 관리자 전용 작업은 ADMIN 역할로만 판정합니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 자격증명에 저장되며, 발급된 토큰의 `role` 클레임으로 그대로 전달됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 관리자 - 관리자 전용 경로 접근 가능
    Admin,
    /// 일반 사용자 - 태스크 조회 및 제출
    User,
}

impl Role {
    /// 저장소/토큰에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
