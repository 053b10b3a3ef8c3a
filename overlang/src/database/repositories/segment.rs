//! Segment repository for database operations.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{NewSegment, SegmentDbModel};
use crate::database::time::now_ms;
use crate::{Error, Result};

#[async_trait]
pub trait SegmentRepository: Send + Sync {
    /// List the segments of a job ordered by `seq`.
    async fn list_by_job(&self, job_id: i64) -> Result<Vec<SegmentDbModel>>;

    /// Atomically replace every segment of a job.
    ///
    /// Fails with [`Error::Conflict`] if two segments share a `seq`; nothing
    /// is written in that case.
    async fn replace_for_job(
        &self,
        job_id: i64,
        segments: &[NewSegment],
    ) -> Result<Vec<SegmentDbModel>>;
}

/// SQLx implementation of SegmentRepository.
pub struct SqlxSegmentRepository {
    pool: SqlitePool,
}

impl SqlxSegmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SegmentRepository for SqlxSegmentRepository {
    async fn list_by_job(&self, job_id: i64) -> Result<Vec<SegmentDbModel>> {
        let segments = sqlx::query_as::<_, SegmentDbModel>(
            "SELECT * FROM segments WHERE job_id = ? ORDER BY seq ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(segments)
    }

    async fn replace_for_job(
        &self,
        job_id: i64,
        segments: &[NewSegment],
    ) -> Result<Vec<SegmentDbModel>> {
        let now = now_ms();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM segments WHERE job_id = ?")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;

        for segment in segments {
            let result = sqlx::query(
                r#"
                INSERT INTO segments (job_id, start_time, end_time, seq, text, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(job_id)
            .bind(segment.start_time)
            .bind(segment.end_time)
            .bind(segment.seq)
            .bind(&segment.text)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => {}
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    // Dropping the transaction rolls it back.
                    return Err(Error::conflict(
                        "segment",
                        format!("duplicate seq {} for job {}", segment.seq, job_id),
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }

        let stored = sqlx::query_as::<_, SegmentDbModel>(
            "SELECT * FROM segments WHERE job_id = ? ORDER BY seq ASC",
        )
        .bind(job_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }
}
