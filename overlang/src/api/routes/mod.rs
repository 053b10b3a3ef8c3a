//! API route modules.
//!
//! Organizes routes by resource type under `/api/v1`.

pub mod auth;
pub mod health;
pub mod jobs;
pub mod projects;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::error::ApiError;
use crate::api::openapi::ApiDoc;
use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/auth", auth::router())
        .nest("/api/v1/health", health::router())
        .nest("/api/v1/projects", projects::router())
        .nest("/api/v1/jobs", jobs::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint")
}
