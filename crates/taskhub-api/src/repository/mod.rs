//! 저장소 계층.
//!
//! 인증/인가 로직은 아래 트레이트를 통해서만 데이터에 접근합니다.
//! 구현체는 인메모리([`MemoryStore`])와 PostgreSQL([`PgStore`]) 두 가지입니다.
//!
//! 동시성 제어는 구현체의 책임입니다. 동일 레코드에 대한 동시 저장은
//! 마지막 쓰기가 이기며, 이메일 중복은 저장소의 유일성 보장으로 판정합니다.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskhub_core::{
    Announcement, NewAnnouncement, NewProject, NewTask, NewUser, Project, Task, TaskHubError,
    UserRecord,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 유일 키 위반
    #[error("이미 존재하는 키: {0}")]
    Duplicate(String),
    /// 저장된 값을 도메인 타입으로 변환할 수 없음
    #[error("손상된 레코드: {0}")]
    Corrupt(String),
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for TaskHubError {
    fn from(err: StoreError) -> Self {
        TaskHubError::Storage(err.to_string())
    }
}

/// 사용자 자격증명 저장소.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>>;

    /// 새 사용자 저장. 이메일이 이미 있으면 [`StoreError::Duplicate`].
    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn list(&self) -> StoreResult<Vec<UserRecord>>;

    async fn count(&self) -> StoreResult<u64>;
}

/// 태스크 저장소.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Task>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>>;

    async fn insert(&self, task: NewTask) -> StoreResult<Task>;

    /// 전체 레코드를 덮어씁니다. 이미 삭제된 경우 `None`.
    async fn update(&self, task: &Task) -> StoreResult<Option<Task>>;

    /// 삭제 여부 반환.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// 여러 건 삭제 후 실제 삭제된 수 반환.
    async fn delete_many(&self, ids: &[i64]) -> StoreResult<u64>;

    async fn count(&self) -> StoreResult<u64>;
}

/// 프로젝트 저장소.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// 프로젝트 저장. 참여자 ID는 정렬/중복 제거된 상태로 저장됩니다.
    async fn insert(&self, project: NewProject) -> StoreResult<Project>;

    async fn exists(&self, id: i64) -> StoreResult<bool>;

    async fn list(&self) -> StoreResult<Vec<Project>>;
}

/// 공지사항 저장소.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    async fn insert(
        &self,
        announcement: NewAnnouncement,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Announcement>;

    async fn list(&self) -> StoreResult<Vec<Announcement>>;
}

/// 핸들러가 공유하는 저장소 묶음.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn CredentialStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub announcements: Arc<dyn AnnouncementStore>,
}

impl Repositories {
    /// 모든 저장소를 하나의 인메모리 저장소로 구성합니다.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            tasks: store.clone(),
            projects: store.clone(),
            announcements: store,
        }
    }

    /// PostgreSQL 연결 풀로 구성합니다.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            tasks: store.clone(),
            projects: store.clone(),
            announcements: store,
        }
    }
}
