//! Project database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Project database model.
/// A video upload owned by a member.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProjectDbModel {
    pub id: i64,
    pub member_id: i64,
    pub title: String,
    pub video_url: String,
    /// Status: CREATED, PROCESSING, COMPLETED, FAILED
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProjectDbModel {
    /// Parsed status. Unknown values (which the schema CHECK forbids) read as `Created`.
    pub fn get_status(&self) -> ProjectStatus {
        ProjectStatus::parse(&self.status).unwrap_or(ProjectStatus::Created)
    }
}

/// Project lifecycle status.
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
pub enum ProjectStatus {
    /// Uploaded, not yet analyzed.
    Created,
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(Self::Created),
            "PROCESSING" => Some(Self::Processing),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}
