//! Member repository for database operations.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{MemberDbModel, NewMember};
use crate::database::time::now_ms;
use crate::{Error, Result};

/// Member repository trait.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member by identity provider subject.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<MemberDbModel>>;

    /// Find a member by numeric id.
    async fn find_by_id(&self, id: i64) -> Result<Option<MemberDbModel>>;

    /// Insert a new member and return the stored row.
    ///
    /// Fails with [`Error::Conflict`] when `external_id` or `email` is
    /// already taken.
    async fn create(&self, member: &NewMember) -> Result<MemberDbModel>;

    /// Count total number of members.
    async fn count(&self) -> Result<i64>;
}

/// SQLx implementation of MemberRepository.
pub struct SqlxMemberRepository {
    pool: SqlitePool,
}

impl SqlxMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqlxMemberRepository {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<MemberDbModel>> {
        let member =
            sqlx::query_as::<_, MemberDbModel>("SELECT * FROM members WHERE external_id = ?")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(member)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MemberDbModel>> {
        let member = sqlx::query_as::<_, MemberDbModel>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn create(&self, member: &NewMember) -> Result<MemberDbModel> {
        let now = now_ms();
        let result = sqlx::query_as::<_, MemberDbModel>(
            r#"
            INSERT INTO members (external_id, email, display_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&member.external_id)
        .bind(&member.email)
        .bind(&member.display_name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::conflict("member", db_err.message().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> Result<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.0)
    }
}
