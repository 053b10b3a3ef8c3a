//! Health check routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::models::{ComponentStatus, HealthResponse};
use crate::api::response::{ApiResponse, ok};
use crate::api::server::AppState;
use crate::database;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint.
///
/// Always answers 200; storage trouble is reported in the body.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Process and storage status", body = ApiResponse<HealthResponse>)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let db_up = database::ping(&state.pool).await;
    ok(HealthResponse {
        server: ComponentStatus::Up,
        db: db_up.into(),
    })
}
