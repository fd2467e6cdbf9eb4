//! Error types for user operations.

use admin_framework::{ApiError, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// The backend has no user with this id.
    #[error("User not found: {0}")]
    NotFound(u64),

    /// The backend rejected the payload.
    #[error("Invalid user: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl UserError {
    /// Maps a failure for user `id`, turning a 404 into [`UserError::NotFound`].
    pub fn for_id(id: u64, error: SourceError) -> Self {
        match error {
            SourceError::Api(e) if e.status().map(|s| s.as_u16()) == Some(404) => UserError::NotFound(id),
            other => other.into(),
        }
    }
}

impl From<SourceError> for UserError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Api(e) if e.field_errors().is_some() => UserError::Validation(e.to_string()),
            SourceError::Api(e) => UserError::Api(e),
            other => UserError::Validation(other.to_string()),
        }
    }
}
