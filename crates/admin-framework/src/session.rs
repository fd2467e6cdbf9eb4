//! # Session Token Guard
//!
//! Persists the OAuth token set in a [`CookieStore`] and warns shortly before
//! the access token expires, so a refresher can swap it for a new one.
//!
//! ## Timer policy
//!
//! Storing a token (or calling [`SessionGuard::resume`] for a token persisted
//! by an earlier run) arms one single-shot timer:
//!
//! - remaining lifetime below the *nearly expired* threshold: the
//!   [`SessionEvent::NearlyExpired`] event is published immediately, inside
//!   the same call;
//! - otherwise the event is published after `remaining − threshold`.
//!
//! Re-arming cancels the previous timer first, and a generation counter makes
//! sure a timer that was already running when it got cancelled stays silent.
//! The guard itself never touches the network.

use crate::error::SessionError;
use crate::events::EventBus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const EXPIRES_AT_KEY: &str = "token_expires_at";
pub const LANGUAGE_KEY: &str = "language";

pub const DEFAULT_NEARLY_EXPIRED: Duration = Duration::from_millis(30_000);

// =============================================================================
// COOKIE STORES
// =============================================================================

/// Durable client-side string storage (the browser cookie jar, elsewhere).
pub trait CookieStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Cookie store persisted as one JSON object on disk. Every write rewrites the file.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileCookieStore {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        debug!(path = %path.display(), entries = entries.len(), "Cookie store opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// TOKEN GUARD
// =============================================================================

/// Token endpoint response. `expires_in` is in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The access token is about to expire; exchange the refresh token now.
    NearlyExpired { refresh_token: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lead time before expiry at which the warning fires.
    pub nearly_expired: Duration,
    /// Added to the server-declared lifetime when computing the expiry timestamp.
    pub expiry_addend: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nearly_expired: DEFAULT_NEARLY_EXPIRED,
            expiry_addend: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct SessionGuard {
    store: Arc<dyn CookieStore>,
    config: SessionConfig,
    events: EventBus<SessionEvent>,
    generation: Arc<AtomicU64>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn CookieStore>, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            events: EventBus::default(),
            generation: Arc::new(AtomicU64::new(0)),
            timer: Mutex::new(None),
        }
    }

    pub fn store_handle(&self) -> Arc<dyn CookieStore> {
        Arc::clone(&self.store)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Persists the token set and re-arms the expiry warning.
    pub fn store(&self, token: &TokenResponse) -> Result<(), SessionError> {
        let expires_at = expiry_timestamp(now_ms(), token.expires_in, self.config.expiry_addend);

        self.store.set(ACCESS_TOKEN_KEY, &token.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &token.refresh_token)?;
        self.store.set(EXPIRES_AT_KEY, &expires_at.to_string())?;
        info!(expires_at, expires_in = token.expires_in, "Session token stored");

        self.arm_timer();
        Ok(())
    }

    /// Re-arms the expiry warning for a token persisted by an earlier run.
    pub fn resume(&self) {
        if self.has_valid_token() {
            debug!("Resuming persisted session");
            self.arm_timer();
        }
    }

    /// Presence check only. An expired but still stored token counts as present.
    pub fn has_valid_token(&self) -> bool {
        self.store.contains(ACCESS_TOKEN_KEY)
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Absolute expiry in milliseconds since the Unix epoch.
    pub fn expires_at(&self) -> Option<i64> {
        self.store.get(EXPIRES_AT_KEY)?.parse().ok()
    }

    /// Purges all three stored values and cancels the pending warning.
    pub fn delete(&self) -> Result<(), SessionError> {
        self.cancel_timer();
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.store.remove(EXPIRES_AT_KEY)?;
        info!("Session token deleted");
        Ok(())
    }

    fn cancel_timer(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
        generation
    }

    fn arm_timer(&self) {
        let generation = self.cancel_timer();
        let Some(expires_at) = self.expires_at() else {
            warn!("Stored token has no readable expiry, warning not armed");
            return;
        };
        let remaining = expires_at.saturating_sub(now_ms());
        let threshold = i64::try_from(self.config.nearly_expired.as_millis()).unwrap_or(i64::MAX);

        if remaining < threshold {
            debug!(remaining, "Token nearly expired at arm time");
            self.events.publish(SessionEvent::NearlyExpired {
                refresh_token: self.refresh_token(),
            });
            return;
        }

        let delay = Duration::from_millis((remaining - threshold) as u64);
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        let current = Arc::clone(&self.generation);
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime, expiry warning not armed");
                return;
            }
        };
        debug!(delay_ms = delay.as_millis() as u64, "Expiry warning armed");
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == generation {
                events.publish(SessionEvent::NearlyExpired {
                    refresh_token: store.get(REFRESH_TOKEN_KEY),
                });
            }
        });
        *self.timer.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Absolute expiry in epoch milliseconds. Lifetimes too large to represent
/// clamp to `i64::MAX`, which never reaches the warning.
fn expiry_timestamp(now_ms: i64, expires_in: u64, addend: Duration) -> i64 {
    let lifetime = Duration::from_secs(expires_in).saturating_add(addend);
    let lifetime_ms = i64::try_from(lifetime.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_add(lifetime_ms)
}
