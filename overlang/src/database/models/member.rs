//! Member database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A local account reconciled from an external identity.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct MemberDbModel {
    /// Store-assigned numeric identifier.
    pub id: i64,
    /// Identity provider subject identifier (unique, immutable).
    pub external_id: String,
    /// Email address (unique).
    pub email: String,
    pub display_name: String,
    /// Unix epoch milliseconds (UTC) when the member was created.
    pub created_at: i64,
    /// Unix epoch milliseconds (UTC) when the member was last updated.
    pub updated_at: i64,
}

/// Values for inserting a member. The id and timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub external_id: String,
    pub email: String,
    pub display_name: String,
}

impl NewMember {
    pub fn new(
        external_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            email: email.into(),
            display_name: display_name.into(),
        }
    }
}
