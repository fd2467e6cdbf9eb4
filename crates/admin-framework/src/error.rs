//! # Framework Errors
//!
//! This module defines the error types used across the framework. Transport
//! failures live in [`ApiError`], failures of externally supplied resource
//! operations in [`SourceError`], persistence failures in [`SessionError`].
//!
//! Controllers never return these to their caller. They log the cause and
//! record a [`ControllerErrorKind`] on their own state instead.

use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Field name → validation messages, as sent by the backend under `errors`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors raised at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request path: {0:?}")]
    InvalidPath(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("HTTP {status}")]
    Http {
        status: StatusCode,
        field_errors: FieldErrors,
        body: String,
    },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Response carried no attachment")]
    MissingAttachment,
}

impl ApiError {
    /// HTTP status of the failure, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-field validation messages (empty unless the backend sent `errors`).
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Http { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

/// Failure of a fetch/create/update/list operation supplied to a controller.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("{0}")]
    Custom(String),
}

impl From<String> for SourceError {
    fn from(msg: String) -> Self {
        SourceError::Custom(msg)
    }
}

/// Errors raised by the client-side cookie store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Cookie store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cookie store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors raised while authenticating or refreshing a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors raised while loading the runtime environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid environment file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Environment has no api_url")]
    MissingApiUrl,
}

/// What a controller was doing when it failed. Stored as state, never thrown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerErrorKind {
    FailedToLoadModel,
    FailedToUpdateModel,
    FailedToRefreshModel,
    FailedToCreateModel,
    FailedToLoadList,
    FailedToRefreshList,
}

impl fmt::Display for ControllerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerErrorKind::FailedToLoadModel => "failed to load model",
            ControllerErrorKind::FailedToUpdateModel => "failed to update model",
            ControllerErrorKind::FailedToRefreshModel => "failed to refresh model",
            ControllerErrorKind::FailedToCreateModel => "failed to create model",
            ControllerErrorKind::FailedToLoadList => "failed to load list",
            ControllerErrorKind::FailedToRefreshList => "failed to refresh list",
        };
        f.write_str(name)
    }
}
