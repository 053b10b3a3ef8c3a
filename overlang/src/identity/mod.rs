//! External identity provider integration.
//!
//! Bearer credentials are resolved from request headers and verified by an
//! [`IdentityVerifier`]. The verifier is built once at startup and injected
//! wherever it is needed.

pub mod bearer;
pub mod error;
pub mod firebase;
pub mod types;
pub mod verifier;

pub use bearer::resolve_bearer_token;
pub use error::IdentityError;
pub use firebase::{FirebaseConfig, FirebaseTokenVerifier};
pub use types::VerifiedIdentity;
pub use verifier::{DisabledVerifier, IdentityVerifier, build_verifier};
