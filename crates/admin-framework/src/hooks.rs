//! # Lifecycle Hooks
//!
//! Optional callbacks a view injects into a controller. `before_create` and
//! `before_update` may adjust the model right before it is sent;
//! `before_model_loaded` and `after_created` only observe it.

use std::fmt;

pub type Hook<T> = Box<dyn Fn(&T) + Send + Sync>;
pub type MutHook<T> = Box<dyn Fn(&mut T) + Send + Sync>;

pub struct Hooks<T> {
    pub before_create: Option<MutHook<T>>,
    pub after_created: Option<Hook<T>>,
    pub before_update: Option<MutHook<T>>,
    pub before_model_loaded: Option<Hook<T>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            before_create: None,
            after_created: None,
            before_update: None,
            before_model_loaded: None,
        }
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_create", &self.before_create.is_some())
            .field("after_created", &self.after_created.is_some())
            .field("before_update", &self.before_update.is_some())
            .field("before_model_loaded", &self.before_model_loaded.is_some())
            .finish()
    }
}

impl<T> Hooks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_create(mut self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.before_create = Some(Box::new(hook));
        self
    }

    pub fn after_created(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.after_created = Some(Box::new(hook));
        self
    }

    pub fn before_update(mut self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.before_update = Some(Box::new(hook));
        self
    }

    pub fn before_model_loaded(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.before_model_loaded = Some(Box::new(hook));
        self
    }
}

pub(crate) fn run<T>(hook: &Option<Hook<T>>, model: &T) {
    if let Some(hook) = hook {
        hook(model);
    }
}

pub(crate) fn run_mut<T>(hook: &Option<MutHook<T>>, model: &mut T) {
    if let Some(hook) = hook {
        hook(model);
    }
}
