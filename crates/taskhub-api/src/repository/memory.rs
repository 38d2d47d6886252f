//! 인메모리 저장소.
//!
//! 데이터베이스 URL이 설정되지 않았을 때와 테스트에서 사용합니다.
//! 모든 테이블을 하나의 `RwLock`으로 보호하므로 이메일 중복 검사와
//! 삽입은 같은 쓰기 잠금 안에서 원자적으로 수행됩니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskhub_core::{
    Announcement, NewAnnouncement, NewProject, NewTask, NewUser, Project, Task, UserRecord,
};
use tokio::sync::RwLock;

use super::{
    AnnouncementStore, CredentialStore, ProjectStore, StoreError, StoreResult, TaskStore,
};

/// ID 자동 증가 테이블.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<UserRecord>,
    tasks: Table<Task>,
    projects: Table<Project>,
    announcements: Table<Announcement>,
}

/// 인메모리 저장소.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        Ok(self.tables.read().await.users.rows.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut tables = self.tables.write().await;
        if tables.users.rows.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }

        let record = UserRecord {
            id: tables.users.allocate_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            provider: user.provider,
            enabled: user.enabled,
        };
        tables.users.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.tables.read().await.users.all())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.users.rows.len() as u64)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tables.read().await.tasks.all())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.rows.get(&id).cloned())
    }

    async fn insert(&self, task: NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        let record = Task {
            id: tables.tasks.allocate_id(),
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            approved_by: None,
            user_id: task.user_id,
            project_id: task.project_id,
        };
        tables.tasks.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, task: &Task) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        match tables.tasks.rows.get_mut(&task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.rows.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[i64]) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let removed = ids
            .iter()
            .filter(|id| tables.tasks.rows.remove(*id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.tables.read().await.tasks.rows.len() as u64)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert(&self, mut project: NewProject) -> StoreResult<Project> {
        project.normalize_members();
        let mut tables = self.tables.write().await;
        let record = Project {
            id: tables.projects.allocate_id(),
            name: project.name,
            description: project.description,
            member_ids: project.member_ids,
        };
        tables.projects.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.read().await.projects.rows.contains_key(&id))
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        Ok(self.tables.read().await.projects.all())
    }
}

#[async_trait]
impl AnnouncementStore for MemoryStore {
    async fn insert(
        &self,
        announcement: NewAnnouncement,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Announcement> {
        let mut tables = self.tables.write().await;
        let record = Announcement {
            id: tables.announcements.allocate_id(),
            title: announcement.title,
            content: announcement.content,
            created_at,
            kind: announcement.kind,
        };
        tables.announcements.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> StoreResult<Vec<Announcement>> {
        Ok(self.tables.read().await.announcements.all())
    }
}
