//! Identity verifier abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{FirebaseConfig, FirebaseTokenVerifier, IdentityError, VerifiedIdentity};
use crate::Result;

/// Verifies opaque bearer credentials against the identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a credential and return the identity it asserts.
    async fn verify(&self, token: &str) -> std::result::Result<VerifiedIdentity, IdentityError>;
}

/// Verifier used when no provider credentials are configured.
///
/// Every verification fails, so protected endpoints reject all callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledVerifier;

#[async_trait]
impl IdentityVerifier for DisabledVerifier {
    async fn verify(&self, _token: &str) -> std::result::Result<VerifiedIdentity, IdentityError> {
        Err(IdentityError::NotConfigured)
    }
}

/// Build the process-wide verifier from configuration.
///
/// A missing credentials path disables verification. A configured path that
/// cannot be read is a startup error.
pub fn build_verifier(
    config: &FirebaseConfig,
    http_client: reqwest::Client,
) -> Result<Arc<dyn IdentityVerifier>> {
    let Some(path) = config.service_account_path.as_deref() else {
        warn!("Identity verification disabled: FIREBASE_SERVICE_ACCOUNT_PATH is empty");
        return Ok(Arc::new(DisabledVerifier));
    };

    let project_id = config.load_project_id()?;
    info!(
        project_id = %project_id,
        path = %path,
        "Firebase token verification initialized"
    );

    Ok(Arc::new(FirebaseTokenVerifier::new(project_id, http_client)))
}
