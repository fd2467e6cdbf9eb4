//! # Edit Controller
//!
//! Loads a model, lets the view mutate it, and sends it back with
//! [`EditController::update`]. The snapshot taken at load time drives
//! [`EditController::no_change`] and the save button's
//! [`EditController::disabled`] state.
//!
//! After a successful update the controller either adopts the representation
//! the server returned (the default) or re-fetches the model from scratch.
//! In the second case `Updated` is only published once the re-fetch landed;
//! a failed re-fetch is recorded as `FailedToRefreshModel`.

use crate::controller::resource::{LifecycleState, Resource};
use crate::error::{ControllerErrorKind, SourceError};
use crate::events::ControllerEvent;
use crate::hooks::{self, Hooks};
use crate::source::ResourceSource;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOptions {
    /// Skip the initial fetch; the caller seeds the model with `set_model`.
    pub prevent_init: bool,
    /// Adopt the update response as the new model (`true`) or re-fetch (`false`).
    pub refresh_from_response: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            prevent_init: false,
            refresh_from_response: true,
        }
    }
}

pub struct EditController<S: ResourceSource> {
    source: S,
    id: S::Id,
    resource: Resource<S::Model>,
    hooks: Hooks<S::Model>,
    options: EditOptions,
}

impl<S: ResourceSource> EditController<S> {
    pub fn new(source: S, id: S::Id) -> Self {
        Self::with_options(source, id, EditOptions::default())
    }

    pub fn with_options(source: S, id: S::Id, options: EditOptions) -> Self {
        Self {
            source,
            id,
            resource: Resource::new(None),
            hooks: Hooks::default(),
            options,
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks<S::Model>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_loading_timeout(mut self, timeout: Duration) -> Self {
        self.resource.set_loading_timeout(timeout);
        self
    }

    pub async fn initialize(&mut self) {
        if self.options.prevent_init {
            debug!(id = %self.id, "Initial fetch suppressed");
            return;
        }
        self.reload().await;
    }

    /// Fetches the model again, discarding local edits.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn reload(&mut self) {
        self.fetch(ControllerErrorKind::FailedToLoadModel).await;
    }

    async fn fetch(&mut self, on_error: ControllerErrorKind) -> bool {
        self.resource.begin();
        match self.source.get_model(&self.id).await {
            Ok(model) => {
                self.set_model(model);
                true
            }
            Err(e) => {
                self.resource.fail(on_error, &e);
                false
            }
        }
    }

    /// Sends the current model. Failures leave the local edits in place.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn update(&mut self) {
        self.resource.begin();
        if let Some(model) = self.resource.model_mut() {
            hooks::run_mut(&self.hooks.before_update, model);
        }

        let outcome = match self.resource.model() {
            Some(model) => self.source.update_model(&self.id, model).await,
            None => Err(SourceError::Custom("no model loaded".to_string())),
        };
        match outcome {
            Ok(saved) if self.options.refresh_from_response => {
                self.set_model(saved);
                info!("Model updated");
                self.resource.emit(ControllerEvent::Updated);
            }
            Ok(_) => {
                info!("Model updated, re-fetching");
                if self.fetch(ControllerErrorKind::FailedToRefreshModel).await {
                    self.resource.emit(ControllerEvent::Updated);
                }
            }
            Err(e) => self
                .resource
                .fail(ControllerErrorKind::FailedToUpdateModel, &e),
        }
    }

    /// Stores `model` as both current value and dirty-check baseline.
    pub fn set_model(&mut self, model: S::Model) {
        self.resource.replace(model, true);
        if let Some(model) = self.resource.model() {
            hooks::run(&self.hooks.before_model_loaded, model);
        }
        self.resource.succeed();
        self.resource.emit(ControllerEvent::Loaded);
    }

    pub fn model(&self) -> Option<&S::Model> {
        self.resource.model()
    }

    /// Mutable access for the view's form bindings.
    pub fn model_mut(&mut self) -> Option<&mut S::Model> {
        self.resource.model_mut()
    }

    pub fn no_change(&self) -> bool {
        self.resource.no_change()
    }

    pub fn disabled(&self) -> bool {
        self.resource.loading() || self.resource.no_change()
    }

    pub fn loading(&self) -> bool {
        self.resource.loading()
    }

    pub fn error(&self) -> bool {
        self.resource.error()
    }

    pub fn error_kind(&self) -> Option<ControllerErrorKind> {
        self.resource.error_kind()
    }

    pub fn state(&self) -> LifecycleState {
        self.resource.state()
    }

    pub fn options(&self) -> EditOptions {
        self.options
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.resource.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        name: String,
        tags: Vec<String>,
        labels: HashMap<String, String>,
    }

    fn profile() -> Profile {
        Profile {
            name: "Ann".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            labels: HashMap::from([
                ("x".to_string(), "1".to_string()),
                ("y".to_string(), "2".to_string()),
            ]),
        }
    }

    #[tokio::test]
    async fn test_initialize_success_clears_flags() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());

        let mut controller = EditController::new(mock.clone(), 1);
        controller.initialize().await;

        assert_eq!(controller.model(), Some(&profile()));
        assert!(!controller.loading());
        assert!(!controller.error());
        assert!(controller.no_change());
        assert!(controller.disabled());
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_model_unchanged() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());
        mock.expect_get()
            .return_err(SourceError::Custom("timeout".into()));

        let mut controller = EditController::new(mock.clone(), 1);
        controller.initialize().await;
        controller.model_mut().unwrap().name = "Bob".to_string();
        controller.reload().await;

        assert_eq!(controller.model().unwrap().name, "Bob");
        assert!(controller.error());
        assert!(!controller.loading());
        assert_eq!(
            controller.error_kind(),
            Some(ControllerErrorKind::FailedToLoadModel)
        );
    }

    #[tokio::test]
    async fn test_dirty_check_is_structural() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());
        let mut controller = EditController::new(mock, 1);
        controller.initialize().await;

        controller.model_mut().unwrap().name = "Bob".to_string();
        assert!(!controller.no_change());
        assert!(!controller.disabled());

        controller.model_mut().unwrap().name = "Ann".to_string();
        assert!(controller.no_change());

        // Map equality ignores insertion order.
        controller.model_mut().unwrap().labels = HashMap::from([
            ("y".to_string(), "2".to_string()),
            ("x".to_string(), "1".to_string()),
        ]);
        assert!(controller.no_change());

        // Sequence equality does not.
        controller.model_mut().unwrap().tags.reverse();
        assert!(!controller.no_change());
    }

    #[tokio::test]
    async fn test_update_adopts_server_response_by_default() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());
        let mut saved = profile();
        saved.name = "Ann (saved)".to_string();
        mock.expect_update().return_ok(saved.clone());

        let mut controller = EditController::new(mock.clone(), 1).with_hooks(
            Hooks::new().before_update(|p: &mut Profile| p.name = p.name.trim().to_string()),
        );
        controller.initialize().await;
        controller.model_mut().unwrap().name = "  Ann  ".to_string();
        let mut events = controller.subscribe();
        controller.update().await;

        assert_eq!(controller.model(), Some(&saved));
        assert!(controller.no_change());
        assert_eq!(events.recv().await.unwrap(), ControllerEvent::Loaded);
        assert_eq!(events.recv().await.unwrap(), ControllerEvent::Updated);
        assert_eq!(mock.updated_models()[0].name, "Ann");
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_can_refetch_instead() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());
        mock.expect_update().return_ok(profile());
        let mut fresh = profile();
        fresh.name = "Fresh".to_string();
        mock.expect_get().return_ok(fresh.clone());

        let options = EditOptions {
            refresh_from_response: false,
            ..EditOptions::default()
        };
        let mut controller = EditController::with_options(mock.clone(), 1, options);
        controller.initialize().await;
        controller.update().await;

        assert_eq!(controller.model(), Some(&fresh));
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_refetch_after_update_is_a_refresh_failure() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());
        mock.expect_update().return_ok(profile());
        mock.expect_get()
            .return_err(SourceError::Custom("gone".into()));

        let options = EditOptions {
            refresh_from_response: false,
            ..EditOptions::default()
        };
        let mut controller = EditController::with_options(mock.clone(), 1, options);
        controller.initialize().await;
        let mut events = controller.subscribe();
        controller.model_mut().unwrap().name = "Bob".to_string();
        controller.update().await;

        assert_eq!(
            controller.error_kind(),
            Some(ControllerErrorKind::FailedToRefreshModel)
        );
        assert!(!controller.loading());
        assert_eq!(controller.model().unwrap().name, "Bob");
        assert_eq!(
            events.recv().await.unwrap(),
            ControllerEvent::Failed(ControllerErrorKind::FailedToRefreshModel)
        );
        assert!(events.try_recv().is_err());
        mock.verify();
    }

    #[tokio::test]
    async fn test_prevent_init_skips_fetch() {
        let mock = MockSource::<Profile>::new();
        let options = EditOptions {
            prevent_init: true,
            ..EditOptions::default()
        };
        let mut controller = EditController::with_options(mock.clone(), 1, options);
        controller.initialize().await;

        assert_eq!(controller.model(), None);
        assert!(!controller.loading());
        assert_eq!(controller.state(), LifecycleState::Idle);

        controller.set_model(profile());
        assert!(controller.no_change());
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_update_keeps_edits() {
        let mock = MockSource::<Profile>::new();
        mock.expect_get().return_ok(profile());
        mock.expect_update()
            .return_err(SourceError::Custom("422".into()));

        let mut controller = EditController::new(mock.clone(), 1);
        controller.initialize().await;
        controller.model_mut().unwrap().name = "Bob".to_string();
        controller.update().await;

        assert_eq!(controller.model().unwrap().name, "Bob");
        assert!(!controller.no_change());
        assert_eq!(
            controller.error_kind(),
            Some(ControllerErrorKind::FailedToUpdateModel)
        );
        mock.verify();
    }
}
