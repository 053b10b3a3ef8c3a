//! Job repository for database operations.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::{JobDbModel, JobStatus};
use crate::database::time::now_ms;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Create a job in `PENDING` status.
    async fn create(&self, project_id: i64, job_type: &str) -> Result<JobDbModel>;

    async fn find_by_id(&self, id: i64) -> Result<Option<JobDbModel>>;

    /// List jobs of a project in creation order.
    async fn list_by_project(&self, project_id: i64) -> Result<Vec<JobDbModel>>;
}

/// SQLx implementation of JobRepository.
pub struct SqlxJobRepository {
    pool: SqlitePool,
}

impl SqlxJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqlxJobRepository {
    async fn create(&self, project_id: i64, job_type: &str) -> Result<JobDbModel> {
        let now = now_ms();
        let job = sqlx::query_as::<_, JobDbModel>(
            r#"
            INSERT INTO jobs (project_id, job_type, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(job_type)
        .bind(JobStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(job)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<JobDbModel>> {
        let job = sqlx::query_as::<_, JobDbModel>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn list_by_project(&self, project_id: i64) -> Result<Vec<JobDbModel>> {
        let jobs = sqlx::query_as::<_, JobDbModel>(
            "SELECT * FROM jobs WHERE project_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }
}
