//! Identity verification errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid or missing Authorization header")]
    MissingToken,

    #[error("Invalid or missing Authorization header")]
    InvalidFormat,

    #[error("Bearer token is empty")]
    EmptyToken,

    #[error("Identity token has expired")]
    TokenExpired,

    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Identity verification is not configured")]
    NotConfigured,

    /// The provider's signing keys could not be retrieved.
    #[error("Failed to fetch identity provider keys: {0}")]
    KeyFetch(String),
}

impl IdentityError {
    /// Everything except an unreachable provider is the caller's fault.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::KeyFetch(_))
    }
}
