//! Permission checks against the signed-in user.

use crate::auth::AuthenticatedUser;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Permission {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Answers "may the current user do `key`?" from the user watch channel.
#[derive(Debug, Clone)]
pub struct PermissionService {
    user: watch::Receiver<Option<AuthenticatedUser>>,
}

impl PermissionService {
    pub fn new(user: watch::Receiver<Option<AuthenticatedUser>>) -> Self {
        Self { user }
    }

    /// False for an empty key or when nobody is signed in.
    pub fn can_activate(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.user
            .borrow()
            .as_ref()
            .is_some_and(|user| user.has_permission(key))
    }

    /// Resolves once the current user (and so the permission set) changed.
    /// Returns `false` when the auth service is gone.
    pub async fn permissions_changed(&mut self) -> bool {
        self.user.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(permissions: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            email: "admin@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            permissions: permissions
                .iter()
                .enumerate()
                .map(|(i, name)| Permission {
                    id: i as u64,
                    name: name.to_string(),
                    kind: "menu".to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_can_activate_follows_current_user() {
        let (tx, rx) = watch::channel(None);
        let mut permissions = PermissionService::new(rx);
        assert!(!permissions.can_activate("users.edit"));

        tx.send_replace(Some(user(&["users.edit"])));
        assert!(permissions.permissions_changed().await);
        assert!(permissions.can_activate("users.edit"));
        assert!(!permissions.can_activate("articles.edit"));
        assert!(!permissions.can_activate(""));

        drop(tx);
        assert!(!permissions.permissions_changed().await);
    }
}
