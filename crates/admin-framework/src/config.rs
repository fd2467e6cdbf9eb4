//! # Environment
//!
//! Runtime settings loaded from `environment.json` (or
//! `environment.prod.json` in production), with optional overrides from
//! `ADMIN_API_URL`, `ADMIN_CLIENT_ID` and `ADMIN_CLIENT_SECRET`.
//!
//! ```json
//! {
//!   "apiUrl": "https://admin.example.com",
//!   "apiUrlPath": "api",
//!   "clientId": "admin",
//!   "clientSecret": "secret"
//! }
//! ```
//!
//! Every key but `apiUrl` is optional.

use crate::error::ConfigError;
use crate::loading::DEFAULT_LOADING_TIMEOUT;
use crate::session::{SessionConfig, DEFAULT_NEARLY_EXPIRED};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const ENVIRONMENT_FILE: &str = "environment.json";
pub const PRODUCTION_ENVIRONMENT_FILE: &str = "environment.prod.json";

pub const API_URL_VAR: &str = "ADMIN_API_URL";
pub const CLIENT_ID_VAR: &str = "ADMIN_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ADMIN_CLIENT_SECRET";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    pub api_url: String,
    pub api_url_path: String,
    pub client_id: String,
    pub client_secret: String,
    pub show_notifications: bool,
    pub loading_timeout_ms: u64,
    pub nearly_expired_ms: u64,
    pub default_locale: String,
    pub available_locales: Vec<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_url_path: "api".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            show_notifications: true,
            loading_timeout_ms: DEFAULT_LOADING_TIMEOUT.as_millis() as u64,
            nearly_expired_ms: DEFAULT_NEARLY_EXPIRED.as_millis() as u64,
            default_locale: "hu".to_string(),
            available_locales: vec!["en".to_string(), "hu".to_string()],
        }
    }
}

impl Environment {
    /// Loads the environment file from `dir`, then applies process
    /// environment overrides.
    pub fn load(dir: impl AsRef<Path>, production: bool) -> Result<Self, ConfigError> {
        let file = if production {
            PRODUCTION_ENVIRONMENT_FILE
        } else {
            ENVIRONMENT_FILE
        };
        let mut env = Self::read(dir.as_ref().join(file))?;
        env.apply_overrides(|key| std::env::var(key).ok());
        env.validate()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::read(path)?.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)?.validate()
    }

    fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading environment");
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replaces the URL and client credentials with values found by `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, field) in [
            (API_URL_VAR, &mut self.api_url),
            (CLIENT_ID_VAR, &mut self.client_id),
            (CLIENT_SECRET_VAR, &mut self.client_secret),
        ] {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                debug!(var, "Environment override applied");
                *field = value;
            }
        }
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingApiUrl);
        }
        self.api_url = trimmed.to_string();
        self.api_url_path = self.api_url_path.trim_matches('/').to_string();
        info!(api_url = %self.api_url, "Environment loaded");
        Ok(self)
    }

    pub fn loading_timeout(&self) -> Duration {
        Duration::from_millis(self.loading_timeout_ms)
    }

    pub fn nearly_expired(&self) -> Duration {
        Duration::from_millis(self.nearly_expired_ms)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            nearly_expired: self.nearly_expired(),
            ..SessionConfig::default()
        }
    }
}
