//! API request and response DTOs.
//!
//! JSON field names are camelCase throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::models::{
    JobDbModel, JobStatus, NewSegment, ProjectDbModel, ProjectStatus, SegmentDbModel,
};
use crate::member::ReconcileOutcome;
use crate::{Error, Result};

// ============================================================================
// Auth
// ============================================================================

/// Member resolved from the caller's bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthMemberResponse {
    pub member_id: i64,
    pub external_id: String,
    pub email: String,
    /// True only on the request that created the member.
    pub is_new_member: bool,
}

impl From<ReconcileOutcome> for AuthMemberResponse {
    fn from(outcome: ReconcileOutcome) -> Self {
        Self {
            member_id: outcome.member.id,
            external_id: outcome.member.external_id,
            email: outcome.member.email,
            is_new_member: outcome.is_new_member,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentStatus {
    Up,
    Down,
}

impl From<bool> for ComponentStatus {
    fn from(up: bool) -> Self {
        if up { Self::Up } else { Self::Down }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `UP` when the process answers.
    pub server: ComponentStatus,
    /// Result of the storage connectivity probe.
    pub db: ComponentStatus,
}

// ============================================================================
// Projects
// ============================================================================

/// Request body for creating a project.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub video_url: String,
}

impl CreateProjectRequest {
    /// Trimmed `(title, video_url)`, both required to be non-blank.
    pub fn validated(&self) -> Result<(&str, &str)> {
        let title = self.title.trim();
        let video_url = self.video_url.trim();
        if title.is_empty() {
            return Err(Error::validation("title must not be blank"));
        }
        if video_url.is_empty() {
            return Err(Error::validation("videoUrl must not be blank"));
        }
        Ok((title, video_url))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i64,
    pub member_id: i64,
    pub title: String,
    pub video_url: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectDbModel> for ProjectResponse {
    fn from(project: ProjectDbModel) -> Self {
        Self {
            status: project.get_status(),
            created_at: crate::database::time::ms_to_datetime(project.created_at),
            updated_at: crate::database::time::ms_to_datetime(project.updated_at),
            id: project.id,
            member_id: project.member_id,
            title: project.title,
            video_url: project.video_url,
        }
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// Request body for creating a job.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    /// Job kind, e.g. `TRANSCRIBE`
    #[serde(rename = "type")]
    pub job_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: i64,
    pub project_id: i64,
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobDbModel> for JobResponse {
    fn from(job: JobDbModel) -> Self {
        Self {
            status: job.get_status(),
            created_at: crate::database::time::ms_to_datetime(job.created_at),
            updated_at: crate::database::time::ms_to_datetime(job.updated_at),
            id: job.id,
            project_id: job.project_id,
            job_type: job.job_type,
        }
    }
}

// ============================================================================
// Segments
// ============================================================================

/// One subtitle line in a replace request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInput {
    /// Seconds from the start of the video
    pub start_time: f64,
    /// Seconds from the start of the video
    pub end_time: f64,
    pub seq: i64,
    pub text: String,
}

/// Request body replacing every segment of a job.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReplaceSegmentsRequest {
    pub segments: Vec<SegmentInput>,
}

impl ReplaceSegmentsRequest {
    /// Validate every segment and reject duplicate `seq` values.
    pub fn into_new_segments(self) -> Result<Vec<NewSegment>> {
        let mut seen = std::collections::HashSet::with_capacity(self.segments.len());
        self.segments
            .into_iter()
            .map(|s| {
                if !seen.insert(s.seq) {
                    return Err(Error::validation(format!("duplicate seq {}", s.seq)));
                }
                NewSegment::new(s.start_time, s.end_time, s.seq, s.text)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResponse {
    pub id: i64,
    pub job_id: i64,
    pub seq: i64,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl From<SegmentDbModel> for SegmentResponse {
    fn from(segment: SegmentDbModel) -> Self {
        Self {
            id: segment.id,
            job_id: segment.job_id,
            seq: segment.seq,
            start_time: segment.start_time,
            end_time: segment.end_time,
            text: segment.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::MemberDbModel;

    #[test]
    fn test_auth_response_is_camel_case() {
        let outcome = ReconcileOutcome {
            member: MemberDbModel {
                id: 3,
                external_id: "uid-3".to_string(),
                email: "c@example.com".to_string(),
                display_name: "c".to_string(),
                created_at: 0,
                updated_at: 0,
            },
            is_new_member: true,
        };

        let json = serde_json::to_value(AuthMemberResponse::from(outcome)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "memberId": 3,
                "externalId": "uid-3",
                "email": "c@example.com",
                "isNewMember": true
            })
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_value(HealthResponse {
            server: ComponentStatus::Up,
            db: false.into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"server": "UP", "db": "DOWN"}));
    }

    #[test]
    fn test_create_project_validation() {
        let req = CreateProjectRequest {
            title: "  Demo ".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
        };
        assert_eq!(req.validated().unwrap().0, "Demo");

        let req = CreateProjectRequest {
            title: " ".to_string(),
            video_url: "x".to_string(),
        };
        assert!(req.validated().is_err());
    }

    #[test]
    fn test_replace_segments_rejects_duplicate_seq() {
        let body: ReplaceSegmentsRequest = serde_json::from_value(serde_json::json!({
            "segments": [
                {"startTime": 0.0, "endTime": 1.0, "seq": 1, "text": "a"},
                {"startTime": 1.0, "endTime": 2.0, "seq": 1, "text": "b"}
            ]
        }))
        .unwrap();

        let err = body.into_new_segments().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_job_request_uses_type_key() {
        let body: CreateJobRequest =
            serde_json::from_value(serde_json::json!({"type": "TRANSCRIBE"})).unwrap();
        assert_eq!(body.job_type, "TRANSCRIBE");
    }
}
