//! Member authentication routes.
//!
//! Both endpoints exchange a verified identity-provider credential for the
//! local member record, creating it on first login.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::api::error::ApiResult;
use crate::api::middleware::VerifiedCaller;
use crate::api::models::AuthMemberResponse;
use crate::api::response::{ApiErrorResponse, ApiResponse, ok};
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/firebase", post(firebase_login))
        .route("/me", get(me))
}

/// Log in with a Firebase ID token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/firebase",
    tag = "auth",
    responses(
        (status = 200, description = "Member resolved", body = ApiResponse<AuthMemberResponse>),
        (status = 401, description = "Missing or invalid credential", body = ApiErrorResponse),
        (status = 500, description = "Unexpected failure", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn firebase_login(
    State(state): State<AppState>,
    caller: VerifiedCaller,
) -> ApiResult<Json<ApiResponse<AuthMemberResponse>>> {
    reconcile_caller(&state, caller).await
}

/// Current member.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Member resolved", body = ApiResponse<AuthMemberResponse>),
        (status = 401, description = "Missing or invalid credential", body = ApiErrorResponse),
        (status = 500, description = "Unexpected failure", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    caller: VerifiedCaller,
) -> ApiResult<Json<ApiResponse<AuthMemberResponse>>> {
    reconcile_caller(&state, caller).await
}

async fn reconcile_caller(
    state: &AppState,
    VerifiedCaller(identity): VerifiedCaller,
) -> ApiResult<Json<ApiResponse<AuthMemberResponse>>> {
    let outcome = state
        .member_service
        .reconcile(
            &identity.external_id,
            identity.email.as_deref(),
            identity.display_name.as_deref(),
        )
        .await?;
    Ok(ok(outcome.into()))
}
