use serde::{Deserialize, Serialize};

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub active: bool,
}

impl User {
    /// New, not yet saved user. The backend assigns the id.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            active: true,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
