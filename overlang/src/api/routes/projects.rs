//! Project routes.
//!
//! Every handler acts for an existing member only. Projects owned by other
//! members are reported as not found.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use tracing::info;

use crate::Error;
use crate::api::error::ApiResult;
use crate::api::middleware::CurrentMember;
use crate::api::models::{CreateJobRequest, CreateProjectRequest, JobResponse, ProjectResponse};
use crate::api::response::{ApiErrorResponse, ApiResponse, created, ok};
use crate::api::server::AppState;
use crate::database::models::ProjectDbModel;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/{id}", get(get_project))
        .route("/{id}/jobs", get(list_jobs).post(create_job))
}

/// Load a project if it belongs to `member_id`.
pub(crate) async fn owned_project(
    state: &AppState,
    project_id: i64,
    member_id: i64,
) -> crate::Result<ProjectDbModel> {
    state
        .project_repository
        .find_owned(project_id, member_id)
        .await?
        .ok_or_else(|| Error::not_found("Project", project_id))
}

/// List the caller's projects, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Projects of the caller", body = ApiResponse<Vec<ProjectResponse>>),
        (status = 401, description = "Unknown or unauthenticated caller", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
) -> ApiResult<Json<ApiResponse<Vec<ProjectResponse>>>> {
    let projects = state.project_repository.list_by_member(member.id).await?;
    Ok(ok(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ApiResponse<ProjectResponse>),
        (status = 401, description = "Unknown or unauthenticated caller", body = ApiErrorResponse),
        (status = 422, description = "Validation error", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ProjectResponse>>)> {
    let Json(request) = payload?;
    let (title, video_url) = request.validated()?;

    let project = state
        .project_repository
        .create(member.id, title, video_url)
        .await?;

    info!(project_id = project.id, member_id = member.id, "Project created");
    Ok(created(project.into()))
}

/// Get one of the caller's projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project details", body = ApiResponse<ProjectResponse>),
        (status = 404, description = "Project not found", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<ProjectResponse>>> {
    let project = owned_project(&state, id, member.id).await?;
    Ok(ok(project.into()))
}

/// List the jobs of one of the caller's projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/jobs",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Jobs of the project", body = ApiResponse<Vec<JobResponse>>),
        (status = 404, description = "Project not found", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<JobResponse>>>> {
    let project = owned_project(&state, id, member.id).await?;
    let jobs = state.job_repository.list_by_project(project.id).await?;
    Ok(ok(jobs.into_iter().map(JobResponse::from).collect()))
}

/// Queue a job for one of the caller's projects.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/jobs",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = ApiResponse<JobResponse>),
        (status = 404, description = "Project not found", body = ApiErrorResponse),
        (status = 422, description = "Validation error", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_job(
    State(state): State<AppState>,
    CurrentMember(member): CurrentMember,
    Path(id): Path<i64>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobResponse>>)> {
    let Json(request) = payload?;
    let job_type = request.job_type.trim();
    if job_type.is_empty() {
        return Err(Error::validation("type must not be blank").into());
    }

    let project = owned_project(&state, id, member.id).await?;
    let job = state.job_repository.create(project.id, job_type).await?;

    info!(job_id = job.id, project_id = project.id, job_type = %job_type, "Job created");
    Ok(created(job.into()))
}
