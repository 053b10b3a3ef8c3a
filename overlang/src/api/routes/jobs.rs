//! Job segment routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use tracing::info;

use crate::Error;
use crate::api::error::ApiResult;
use crate::api::middleware::CurrentMember;
use crate::api::models::{ReplaceSegmentsRequest, SegmentResponse};
use crate::api::response::{ApiErrorResponse, ApiResponse, ok};
use crate::api::routes::projects::owned_project;
use crate::api::server::AppState;
use crate::database::models::JobDbModel;

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/segments", get(list_segments).put(replace_segments))
}

/// Load a job if its project belongs to `member_id`.
async fn owned_job(state: &AppState, job_id: i64, member_id: i64) -> crate::Result<JobDbModel> {
    let job = state
        .job_repository
        .find_by_id(job_id)
        .await?
        .ok_or_else(|| Error::not_found("Job", job_id))?;

    match owned_project(state, job.project_id, member_id).await {
        Ok(_) => Ok(job),
        Err(Error::NotFound { .. }) => Err(Error::not_found("Job", job_id)),
        Err(e) => Err(e),
    }
}

/// List the segments of a job, ordered by `seq`.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/segments",
    tag = "jobs",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Segments of the job", body = ApiResponse<Vec<SegmentResponse>>),
        (status = 404, description = "Job not found", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_segments(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<SegmentResponse>>>> {
    let job = owned_job(&state, id, member.id).await?;
    let segments = state.segment_repository.list_by_job(job.id).await?;
    Ok(ok(segments.into_iter().map(SegmentResponse::from).collect()))
}

/// Replace every segment of a job in one transaction.
#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}/segments",
    tag = "jobs",
    params(("id" = i64, Path, description = "Job ID")),
    request_body = ReplaceSegmentsRequest,
    responses(
        (status = 200, description = "Stored segments", body = ApiResponse<Vec<SegmentResponse>>),
        (status = 404, description = "Job not found", body = ApiErrorResponse),
        (status = 422, description = "Invalid segment or duplicate seq", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn replace_segments(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<i64>,
    payload: Result<Json<ReplaceSegmentsRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Vec<SegmentResponse>>>> {
    let Json(request) = payload?;
    let segments = request.into_new_segments()?;
    let job = owned_job(&state, id, member.id).await?;

    let stored = match state
        .segment_repository
        .replace_for_job(job.id, &segments)
        .await
    {
        Ok(stored) => stored,
        Err(Error::Conflict { detail, .. }) => return Err(Error::validation(detail).into()),
        Err(e) => return Err(e.into()),
    };

    info!(job_id = job.id, count = stored.len(), "Segments replaced");
    Ok(ok(stored.into_iter().map(SegmentResponse::from).collect()))
}
