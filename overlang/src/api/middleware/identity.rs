//! Bearer credential authentication extractors.
//!
//! [`VerifiedCaller`] resolves and verifies the `Authorization` header.
//! [`CurrentMember`] additionally requires that the caller is an existing
//! member and never creates one.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::database::models::MemberDbModel;
use crate::identity::{VerifiedIdentity, resolve_bearer_token};
use crate::Error;

/// Identity asserted by a verified bearer credential.
#[derive(Debug, Clone)]
pub struct VerifiedCaller(pub VerifiedIdentity);

impl FromRequestParts<AppState> for VerifiedCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = resolve_bearer_token(&parts.headers).map_err(|e| {
            warn!(path = %parts.uri.path(), error = %e, "Rejected request credentials");
            Error::from(e)
        })?;

        let identity = state.verifier.verify(token).await.map_err(Error::from)?;

        debug!(external_id = %identity.external_id, "Caller authenticated");
        Ok(Self(identity))
    }
}

/// The existing member behind a verified bearer credential.
#[derive(Debug, Clone)]
pub struct CurrentMember(pub MemberDbModel);

impl FromRequestParts<AppState> for CurrentMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let VerifiedCaller(identity) = VerifiedCaller::from_request_parts(parts, state).await?;
        let member = state
            .member_service
            .get_existing(&identity.external_id)
            .await?;
        Ok(Self(member))
    }
}
