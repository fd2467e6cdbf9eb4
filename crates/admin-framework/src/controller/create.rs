//! # Create Controller
//!
//! Holds a draft model (seeded from an initial value) and submits it.

use crate::controller::resource::{LifecycleState, Resource};
use crate::error::ControllerErrorKind;
use crate::events::ControllerEvent;
use crate::hooks::{self, Hooks};
use crate::source::ResourceSource;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, instrument};

pub struct CreateController<S: ResourceSource> {
    source: S,
    resource: Resource<S::Model>,
    hooks: Hooks<S::Model>,
}

impl<S: ResourceSource> CreateController<S> {
    pub fn new(source: S, init: S::Model) -> Self {
        let mut resource = Resource::new(None);
        resource.replace(init, true);
        Self {
            source,
            resource,
            hooks: Hooks::default(),
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

    /// Submits `model`. It only becomes the current model if the server accepts it.
    #[instrument(skip(self, model))]
    pub async fn create(&mut self, mut model: S::Model) {
        self.resource.begin();
        hooks::run_mut(&self.hooks.before_create, &mut model);
        match self.source.create_model(&model).await {
            Ok(created) => {
                self.resource.replace(created, true);
                self.resource.succeed();
                if let Some(created) = self.resource.model() {
                    hooks::run(&self.hooks.after_created, created);
                }
                info!("Model created");
                self.resource.emit(ControllerEvent::Created);
            }
            Err(e) => self
                .resource
                .fail(ControllerErrorKind::FailedToCreateModel, &e),
        }
    }

    /// Submits the draft held by the controller.
    pub async fn submit(&mut self) {
        if let Some(draft) = self.resource.model().cloned() {
            self.create(draft).await;
        }
    }

    pub fn model(&self) -> Option<&S::Model> {
        self.resource.model()
    }

    pub fn model_mut(&mut self) -> Option<&mut S::Model> {
        self.resource.model_mut()
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

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.resource.subscribe()
    }
}
