//! # Authentication
//!
//! [`AuthService`] signs the user in and out against the OAuth endpoints and
//! keeps the current user and the authenticated flag in `watch` channels.
//! [`SessionRefresher`] is the background loop that answers the session
//! guard's *nearly expired* warning by exchanging the refresh token.
//!
//! ```text
//! SessionGuard ──NearlyExpired──▶ SessionRefresher ──▶ AuthService::refresh_access_token
//!                                                         │
//!                                 ◀── store(token) ───────┘
//! ```

use crate::api::ApiClient;
use crate::config::Environment;
use crate::error::AuthError;
use crate::permission::Permission;
use crate::session::{SessionEvent, SessionGuard, TokenResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

pub const TOKEN_PATH: &str = "/oauth/token";
pub const ME_PATH: &str = "/me";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl AuthenticatedUser {
    /// "First Last", or empty unless both parts are known.
    pub fn display_name(&self) -> String {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

pub struct AuthService {
    api: Arc<ApiClient>,
    client_id: String,
    client_secret: String,
    register_path: String,
    user: watch::Sender<Option<AuthenticatedUser>>,
    authenticated: watch::Sender<bool>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, env: &Environment) -> Self {
        Self {
            api,
            client_id: env.client_id.clone(),
            client_secret: env.client_secret.clone(),
            register_path: format!("/{}/register", env.api_url_path),
            user: watch::Sender::new(None),
            authenticated: watch::Sender::new(false),
        }
    }

    pub fn session(&self) -> &Arc<SessionGuard> {
        self.api.session()
    }

    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<AuthenticatedUser>> {
        self.user.subscribe()
    }

    pub fn subscribe_authenticated(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Password grant. On success the token is stored and the user loaded.
    #[instrument(skip(self, password))]
    pub async fn obtain_access_token(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let form = [
            ("username", username),
            ("password", password),
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        self.exchange(&form).await
    }

    #[instrument(skip_all)]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<bool, AuthError> {
        let form = [
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        self.exchange(&form).await
    }

    /// Creates an account; the backend answers with a token set for it.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_user(&self, request: &RegisterRequest) -> Result<bool, AuthError> {
        let form = [
            ("first_name", request.first_name.as_str()),
            ("last_name", request.last_name.as_str()),
            ("email", request.email.as_str()),
            ("password", request.password.as_str()),
            ("password_confirmation", request.password_confirmation.as_str()),
        ];
        let token: TokenResponse = self
            .api
            .post_form(&self.register_path, &form, self.client_credentials())
            .await?;
        self.session().store(&token)?;
        self.check_auth().await
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<bool, AuthError> {
        let token: TokenResponse = self
            .api
            .post_form(TOKEN_PATH, form, self.client_credentials())
            .await?;
        self.session().store(&token)?;
        self.check_auth().await
    }

    fn client_credentials(&self) -> (&str, &str) {
        (&self.client_id, &self.client_secret)
    }

    /// Loads `/me` when a token is stored. Without a token, or when the call
    /// fails, the session is purged.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> Result<bool, AuthError> {
        if !self.session().has_valid_token() {
            debug!("No stored token");
            self.purge_auth()?;
            return Ok(false);
        }
        match self.api.get_one::<AuthenticatedUser>(ME_PATH, &[]).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "Authenticated");
                self.set_auth(user);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load current user");
                if let Err(purge) = self.purge_auth() {
                    warn!(error = %purge, "Failed to purge session");
                }
                Err(e.into())
            }
        }
    }

    /// Signs out: clears the user, lowers the flag and deletes the token.
    pub fn purge_auth(&self) -> Result<(), AuthError> {
        self.user.send_if_modified(|current| current.take().is_some());
        self.authenticated.send_replace(false);
        self.session().delete()?;
        Ok(())
    }

    fn set_auth(&self, user: AuthenticatedUser) {
        self.authenticated.send_replace(true);
        self.user.send_if_modified(|current| {
            if current.as_ref() == Some(&user) {
                return false;
            }
            *current = Some(user);
            true
        });
    }
}

/// Route guard: lets the caller through only while authenticated.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    authenticated: watch::Receiver<bool>,
}

impl AuthGuard {
    pub fn new(auth: &AuthService) -> Self {
        Self {
            authenticated: auth.subscribe_authenticated(),
        }
    }

    pub fn can_activate(&self) -> bool {
        *self.authenticated.borrow()
    }
}

/// Exchanges the refresh token whenever the session guard warns.
pub struct SessionRefresher {
    auth: Arc<AuthService>,
    events: broadcast::Receiver<SessionEvent>,
}

impl SessionRefresher {
    /// Subscribes immediately, so a warning published before `run` is polled is not lost.
    pub fn new(auth: Arc<AuthService>) -> Self {
        let events = auth.session().subscribe();
        Self { auth, events }
    }

    pub async fn run(mut self) {
        info!("Session refresher started");
        loop {
            match self.events.recv().await {
                Ok(SessionEvent::NearlyExpired {
                    refresh_token: Some(token),
                }) => {
                    debug!("Token nearly expired, refreshing");
                    match self.auth.refresh_access_token(&token).await {
                        Ok(authenticated) => info!(authenticated, "Session refreshed"),
                        Err(e) => warn!(error = %e, "Session refresh failed"),
                    }
                }
                Ok(SessionEvent::NearlyExpired { refresh_token: None }) => {
                    warn!("Token nearly expired but no refresh token is stored");
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session refresher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!("Session refresher stopped");
    }
}
