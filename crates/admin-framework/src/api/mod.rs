//! # HTTP Boundary
//!
//! [`ApiClient`] speaks to the backend, [`ErrorReporter`] turns its failures
//! into notifications, and [`RestSource`] adapts a REST collection to the
//! controller source traits.

pub mod client;
pub mod errors;
pub mod rest;

pub use client::{attachment_file_name, ApiClient, Attachment, DEFAULT_ATTACHMENT_NAME};
pub use errors::{ErrorMessages, ErrorReporter};
pub use rest::RestSource;
