//! # Language Service
//!
//! Tracks the active locale. The current locale lives in a `watch` channel:
//! the API client reads it for `Accept-Language`, and any view that needs to
//! re-render on a language change subscribes to it.

use crate::api::ApiClient;
use crate::config::Environment;
use crate::session::{CookieStore, LANGUAGE_KEY};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub const DEFAULT_LOCALE: &str = "hu";
pub const LANGUAGES_PATH: &str = "/language";

pub fn default_available_locales() -> Vec<String> {
    vec!["en".to_string(), "hu".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Language {
    pub id: u64,
    pub name: String,
    pub locale: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Default)]
struct Catalog {
    default_lang: Option<String>,
    languages: Vec<Language>,
    locales: Vec<String>,
}

pub struct LanguageService {
    store: Arc<dyn CookieStore>,
    fallback_locale: String,
    fallback_locales: Vec<String>,
    current: watch::Sender<String>,
    catalog: RwLock<Catalog>,
}

impl LanguageService {
    /// Starts with the stored `language` cookie, else the configured default.
    pub fn new(store: Arc<dyn CookieStore>, env: &Environment) -> Self {
        let fallback_locale = if env.default_locale.is_empty() {
            DEFAULT_LOCALE.to_string()
        } else {
            env.default_locale.clone()
        };
        let fallback_locales = if env.available_locales.is_empty() {
            default_available_locales()
        } else {
            env.available_locales.clone()
        };
        let initial = store.get(LANGUAGE_KEY).unwrap_or_else(|| fallback_locale.clone());
        Self {
            store,
            current: watch::Sender::new(initial),
            catalog: RwLock::new(Catalog {
                locales: fallback_locales.clone(),
                ..Catalog::default()
            }),
            fallback_locale,
            fallback_locales,
        }
    }

    /// Receiver handed to the API client for the `Accept-Language` header.
    pub fn locale_receiver(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    pub fn current_lang(&self) -> String {
        self.current.borrow().clone()
    }

    /// Fallback locale announced by the backend, if it announced one.
    pub fn default_lang(&self) -> Option<String> {
        self.catalog().default_lang.clone()
    }

    pub fn available_languages(&self) -> Vec<Language> {
        self.catalog().languages.clone()
    }

    /// Known locales, the current one first.
    pub fn available_keys(&self) -> Vec<String> {
        let current = self.current_lang();
        let mut keys = vec![current.clone()];
        keys.extend(self.catalog().locales.iter().filter(|l| **l != current).cloned());
        keys
    }

    /// Switches the locale, optionally remembering it in the cookie store.
    /// Subscribers are notified even if the locale did not change.
    pub fn set_language(&self, lang: &str, persist: bool) {
        if persist {
            if let Err(e) = self.store.set(LANGUAGE_KEY, lang) {
                warn!(error = %e, lang, "Failed to persist language");
            }
        }
        info!(lang, "Language changed");
        self.current.send_replace(lang.to_string());
    }

    /// Fetches the language list. On failure the built-in locales are used.
    pub async fn initialize(&self, api: &ApiClient) {
        match api.get_one::<Vec<Language>>(LANGUAGES_PATH, &[]).await {
            Ok(languages) => self.handle_languages_response(languages),
            Err(e) => {
                warn!(error = %e, "Failed to load languages, using defaults");
                self.set_defaults();
            }
        }
    }

    /// Keeps the active languages, adopts the backend default and re-applies
    /// the stored (or fallback) locale.
    pub fn handle_languages_response(&self, languages: Vec<Language>) {
        let actives: Vec<Language> = languages.into_iter().filter(|l| l.active).collect();
        {
            let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
            catalog.default_lang = actives.iter().find(|l| l.default).map(|l| l.locale.clone());
            catalog.locales = actives.iter().map(|l| l.locale.clone()).collect();
            debug!(count = actives.len(), default = ?catalog.default_lang, "Languages loaded");
            catalog.languages = actives;
        }
        self.set_language(&self.stored_or_fallback(), false);
    }

    fn set_defaults(&self) {
        {
            let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
            catalog.locales = self.fallback_locales.clone();
        }
        self.set_language(&self.stored_or_fallback(), false);
    }

    fn stored_or_fallback(&self) -> String {
        self.store
            .get(LANGUAGE_KEY)
            .unwrap_or_else(|| self.fallback_locale.clone())
    }

    fn catalog(&self) -> std::sync::RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }
}
