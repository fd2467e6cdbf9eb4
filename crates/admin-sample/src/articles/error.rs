//! Error types for article operations.

use admin_framework::{ApiError, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("Article not found: {0}")]
    NotFound(u64),

    /// Publishing was requested for an article that is already live.
    #[error("Article {0} is already published")]
    AlreadyPublished(u64),

    #[error("Invalid article: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl ArticleError {
    pub fn for_id(id: u64, error: SourceError) -> Self {
        match error {
            SourceError::Api(e) if e.status().map(|s| s.as_u16()) == Some(404) => ArticleError::NotFound(id),
            other => other.into(),
        }
    }
}

impl From<SourceError> for ArticleError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Api(e) => ArticleError::Api(e),
            other => ArticleError::Validation(other.to_string()),
        }
    }
}
