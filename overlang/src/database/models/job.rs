//! Job database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Job database model.
/// A processing task spawned for a project. No engine consumes jobs yet.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct JobDbModel {
    pub id: i64,
    pub project_id: i64,
    /// Free-form job kind, e.g. "TRANSCRIBE"
    pub job_type: String,
    /// Status: PENDING, RUNNING, COMPLETED, FAILED
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl JobDbModel {
    pub fn get_status(&self) -> JobStatus {
        JobStatus::parse(&self.status).unwrap_or(JobStatus::Pending)
    }
}

/// Job status values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Queued, waiting for a worker.
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "RUNNING" => Some(Self::Running),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_parse() {
        assert_eq!(JobStatus::parse("RUNNING"), Some(JobStatus::Running));
        assert_eq!(JobStatus::parse("INTERRUPTED"), None);
        assert_eq!(JobStatus::Running.to_string(), "RUNNING");
    }
}
