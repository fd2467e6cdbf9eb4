//! # User Client
//!
//! Typed access to the user collection plus the `set_active` action.

use crate::model::User;
use crate::users::{UserError, USERS_RESOURCE};
use admin_framework::api::{ApiClient, RestSource};
use admin_framework::controller::{EditController, ListController};
use admin_framework::ResourceSource;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone, Debug)]
pub struct UserClient {
    source: RestSource<User>,
}

impl UserClient {
    pub fn new(api: Arc<ApiClient>, api_url_path: &str) -> Self {
        let path = format!("/{}/{}", api_url_path, USERS_RESOURCE);
        Self {
            source: RestSource::new(api, path),
        }
    }

    pub fn source(&self) -> RestSource<User> {
        self.source.clone()
    }

    pub fn list_view(&self) -> ListController<RestSource<User>> {
        ListController::new(self.source())
    }

    pub fn edit_view(&self, id: u64) -> EditController<RestSource<User>> {
        EditController::new(self.source(), id)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<User, UserError> {
        self.source
            .get_model(&id)
            .await
            .map_err(|e| UserError::for_id(id, e))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn update(&self, id: u64, user: &User) -> Result<User, UserError> {
        self.source
            .update_model(&id, user)
            .await
            .map_err(|e| UserError::for_id(id, e))
    }

    /// Enables or disables sign-in for the user.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: u64, active: bool) -> Result<User, UserError> {
        let path = format!("{}/status", self.source.item_path(id));
        let user: User = self
            .source
            .api()
            .put(&path, &json!({ "active": active }))
            .await?;
        info!(active = user.active, "User status changed");
        Ok(user)
    }
}
