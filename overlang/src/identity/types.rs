//! Identity types.

use serde::{Deserialize, Serialize};

/// Identity asserted by a successfully verified bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Subject identifier issued by the provider.
    pub external_id: String,
    /// Provider-reported email, absent for some sign-in methods.
    pub email: Option<String>,
    /// Provider-reported display name.
    pub display_name: Option<String>,
}

impl VerifiedIdentity {
    pub fn new(
        external_id: impl Into<String>,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            email,
            display_name,
        }
    }
}
