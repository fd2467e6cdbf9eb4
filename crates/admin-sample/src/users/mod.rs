//! # Users
//!
//! Administrator accounts under `/{api_url_path}/users`. Users are listed,
//! edited and (de)activated; creation goes through the registration
//! endpoint of [`AuthService`](admin_framework::AuthService).
//!
//! - [`error`] - [`UserError`]
//! - [`UserClient`](crate::clients::UserClient) - typed access and the
//!   `set_active` action

pub mod error;

pub use error::*;

/// Collection name under the API path.
pub const USERS_RESOURCE: &str = "users";
