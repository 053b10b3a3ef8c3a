//! Project repository for database operations.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::{ProjectDbModel, ProjectStatus};
use crate::database::time::now_ms;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a project in `CREATED` status.
    async fn create(&self, member_id: i64, title: &str, video_url: &str)
    -> Result<ProjectDbModel>;

    /// Find a project only if it belongs to `member_id`.
    async fn find_owned(&self, id: i64, member_id: i64) -> Result<Option<ProjectDbModel>>;

    /// List a member's projects, newest first.
    async fn list_by_member(&self, member_id: i64) -> Result<Vec<ProjectDbModel>>;
}

/// SQLx implementation of ProjectRepository.
pub struct SqlxProjectRepository {
    pool: SqlitePool,
}

impl SqlxProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(
        &self,
        member_id: i64,
        title: &str,
        video_url: &str,
    ) -> Result<ProjectDbModel> {
        let now = now_ms();
        let project = sqlx::query_as::<_, ProjectDbModel>(
            r#"
            INSERT INTO projects (member_id, title, video_url, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(title)
        .bind(video_url)
        .bind(ProjectStatus::Created.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    async fn find_owned(&self, id: i64, member_id: i64) -> Result<Option<ProjectDbModel>> {
        let project = sqlx::query_as::<_, ProjectDbModel>(
            "SELECT * FROM projects WHERE id = ? AND member_id = ?",
        )
        .bind(id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn list_by_member(&self, member_id: i64) -> Result<Vec<ProjectDbModel>> {
        let projects = sqlx::query_as::<_, ProjectDbModel>(
            "SELECT * FROM projects WHERE member_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }
}
