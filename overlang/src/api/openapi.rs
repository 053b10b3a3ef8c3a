//! OpenAPI documentation configuration.
//!
//! The document is served at `/api-docs/openapi.json` and browsable through
//! Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

use crate::api::models::{
    AuthMemberResponse, ComponentStatus, CreateJobRequest, CreateProjectRequest, HealthResponse,
    JobResponse, ProjectResponse, ReplaceSegmentsRequest, SegmentInput, SegmentResponse,
};
use crate::api::response::{ApiErrorResponse, ErrorBody, ResponseStatus};
use crate::database::models::{JobStatus, ProjectStatus};

/// OpenAPI documentation for the overlang API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "overlang API",
        version = "0.1.0",
        description = "Backend for the overlang video subtitling product: member authentication, projects, jobs and subtitle segments.",
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "health", description = "Process and storage status"),
        (name = "auth", description = "Member authentication with identity-provider tokens"),
        (name = "projects", description = "Video projects and their jobs"),
        (name = "jobs", description = "Subtitle segments produced by jobs")
    ),
    paths(
        crate::api::routes::health::health_check,
        crate::api::routes::auth::firebase_login,
        crate::api::routes::auth::me,
        crate::api::routes::projects::list_projects,
        crate::api::routes::projects::create_project,
        crate::api::routes::projects::get_project,
        crate::api::routes::projects::list_jobs,
        crate::api::routes::projects::create_job,
        crate::api::routes::jobs::list_segments,
        crate::api::routes::jobs::replace_segments,
    ),
    components(
        schemas(
            ResponseStatus,
            ErrorBody,
            ApiErrorResponse,
            HealthResponse,
            ComponentStatus,
            AuthMemberResponse,
            CreateProjectRequest,
            ProjectResponse,
            ProjectStatus,
            CreateJobRequest,
            JobResponse,
            JobStatus,
            SegmentInput,
            ReplaceSegmentsRequest,
            SegmentResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme addon for Bearer authentication with provider ID tokens.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
