//! PostgreSQL 저장소.
//!
//! 스키마는 `migrations/` 디렉토리에 있으며 서버 시작 시 적용됩니다.
//! 이메일 유일성은 `users.email` UNIQUE 제약으로 보장합니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use taskhub_core::{
    Announcement, AnnouncementKind, NewAnnouncement, NewProject, NewTask, NewUser, Project, Role,
    Task, TaskStatus, UserRecord,
};

use super::{
    AnnouncementStore, CredentialStore, ProjectStore, StoreError, StoreResult, TaskStore,
};

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

// ================================================================================================
// Rows
// ================================================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    provider: String,
    enabled: bool,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StoreError::Corrupt(format!("users.role = {}", row.role)))?;
        Ok(UserRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            provider: row.provider,
            enabled: row.enabled,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    #[sqlx(default)]
    description: Option<String>,
    status: String,
    #[sqlx(default)]
    due_date: Option<NaiveDate>,
    #[sqlx(default)]
    approved_by: Option<String>,
    #[sqlx(default)]
    user_id: Option<i64>,
    #[sqlx(default)]
    project_id: Option<i64>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Corrupt(format!("tasks.status = {}", row.status)))?;
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status,
            due_date: row.due_date,
            approved_by: row.approved_by,
            user_id: row.user_id,
            project_id: row.project_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: i64,
    name: String,
    #[sqlx(default)]
    description: Option<String>,
    member_ids: Vec<i64>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            member_ids: row.member_ids,
        }
    }
}

#[derive(Debug, FromRow)]
struct AnnouncementRow {
    id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    kind: String,
}

impl TryFrom<AnnouncementRow> for Announcement {
    type Error = StoreError;

    fn try_from(row: AnnouncementRow) -> Result<Self, Self::Error> {
        let kind = AnnouncementKind::parse(&row.kind)
            .ok_or_else(|| StoreError::Corrupt(format!("announcements.kind = {}", row.kind)))?;
        Ok(Announcement {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            kind,
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

// ================================================================================================
// Store
// ================================================================================================

/// PostgreSQL 기반 저장소.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, provider, enabled";
const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, approved_by, user_id, project_id";

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let result: Result<UserRow, sqlx::Error> = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, provider, enabled)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.provider)
        .bind(user.enabled)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => UserRecord::try_from(row),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> StoreResult<Vec<UserRecord>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        collect(rows)
    }

    async fn count(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        collect(rows)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Task::try_from).transpose()
    }

    async fn insert(&self, task: NewTask) -> StoreResult<Task> {
        let row: TaskRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tasks (title, description, status, due_date, user_id, project_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.user_id)
        .bind(task.project_id)
        .fetch_one(&self.pool)
        .await?;
        Task::try_from(row)
    }

    async fn update(&self, task: &Task) -> StoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, due_date = $5,
                approved_by = $6, user_id = $7, project_id = $8
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(&task.approved_by)
        .bind(task.user_id)
        .bind(task.project_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[i64]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM tasks WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert(&self, mut project: NewProject) -> StoreResult<Project> {
        project.normalize_members();
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO projects (name, description) VALUES ($1, $2) RETURNING id")
                .bind(&project.name)
                .bind(&project.description)
                .fetch_one(&mut *tx)
                .await?;

        if !project.member_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                SELECT $1, UNNEST($2::BIGINT[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(&project.member_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Project {
            id,
            name: project.name,
            description: project.description,
            member_ids: project.member_ids,
        })
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        let (found,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(found)
    }

    async fn list(&self) -> StoreResult<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.name, p.description,
                   COALESCE(ARRAY_AGG(m.user_id ORDER BY m.user_id)
                            FILTER (WHERE m.user_id IS NOT NULL), '{}') AS member_ids
            FROM projects p
            LEFT JOIN project_members m ON m.project_id = p.id
            GROUP BY p.id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }
}

#[async_trait]
impl AnnouncementStore for PgStore {
    async fn insert(
        &self,
        announcement: NewAnnouncement,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Announcement> {
        let row: AnnouncementRow = sqlx::query_as(
            r#"
            INSERT INTO announcements (title, content, created_at, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, created_at, kind
            "#,
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(created_at)
        .bind(announcement.kind.as_str())
        .fetch_one(&self.pool)
        .await?;
        Announcement::try_from(row)
    }

    async fn list(&self) -> StoreResult<Vec<Announcement>> {
        let rows: Vec<AnnouncementRow> = sqlx::query_as(
            "SELECT id, title, content, created_at, kind FROM announcements ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_rejects_unknown_status() {
        let row = TaskRow {
            id: 1,
            title: "t".to_string(),
            description: None,
            status: "COMPLETED".to_string(),
            due_date: None,
            approved_by: None,
            user_id: None,
            project_id: None,
        };
        assert!(matches!(Task::try_from(row), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_user_row_conversion() {
        let row = UserRow {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "ADMIN".to_string(),
            provider: "LOCAL".to_string(),
            enabled: true,
        };
        let user = UserRecord::try_from(row).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, 7);
    }
}
