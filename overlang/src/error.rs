//! Application-wide error types.

use thiserror::Error;

use crate::identity::IdentityError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseSqlx(#[from] sqlx::Error),

    /// A write was rejected by a storage-level uniqueness constraint.
    #[error("Conflict on {entity}: {detail}")]
    Conflict { entity: String, detail: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    ApiError(String),
}

impl Error {
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(entity: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            detail: detail.into(),
        }
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error is the storage uniqueness signal.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether the caller should be treated as not authenticated.
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Self::Unauthenticated(_) => true,
            Self::Identity(e) => e.is_unauthenticated(),
            _ => false,
        }
    }
}
