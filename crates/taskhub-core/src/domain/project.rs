//! 프로젝트 및 공지사항 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 프로젝트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 참여 사용자 ID 목록
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

/// 프로젝트 생성 입력.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

impl NewProject {
    /// 참여자 ID를 오름차순으로 정렬하고 중복을 제거합니다.
    ///
    /// 저장소 목록 조회 결과와 같은 순서가 됩니다.
    pub fn normalize_members(&mut self) {
        self.member_ids.sort_unstable();
        self.member_ids.dedup();
    }
}

/// 공지사항 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Warning,
    Success,
}

impl AnnouncementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementKind::Info => "INFO",
            AnnouncementKind::Warning => "WARNING",
            AnnouncementKind::Success => "SUCCESS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" => Some(AnnouncementKind::Info),
            "WARNING" => Some(AnnouncementKind::Warning),
            "SUCCESS" => Some(AnnouncementKind::Success),
            _ => None,
        }
    }
}

/// 공지사항.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
}

/// 공지사항 작성 입력. 작성 시각은 서버가 채웁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: AnnouncementKind,
}
