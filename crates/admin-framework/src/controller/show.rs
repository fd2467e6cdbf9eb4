//! # Show Controller
//!
//! Read-only view of a single model: fetch it, expose it, re-fetch on demand.

use crate::controller::resource::{LifecycleState, Resource};
use crate::error::{ControllerErrorKind, SourceError};
use crate::events::ControllerEvent;
use crate::hooks::{self, Hooks};
use crate::source::ResourceSource;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

pub struct ShowController<S: ResourceSource> {
    source: S,
    id: S::Id,
    resource: Resource<S::Model>,
    hooks: Hooks<S::Model>,
}

impl<S: ResourceSource> ShowController<S> {
    pub fn new(source: S, id: S::Id) -> Self {
        Self {
            source,
            id,
            resource: Resource::new(None),
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

    pub async fn initialize(&mut self) {
        self.load(ControllerErrorKind::FailedToLoadModel).await;
    }

    /// Re-fetches the model. A failure here counts as a failed refresh.
    pub async fn refresh(&mut self) {
        self.load(ControllerErrorKind::FailedToRefreshModel).await;
    }

    #[instrument(skip(self), fields(id = %self.id))]
    async fn load(&mut self, on_failure: ControllerErrorKind) {
        self.resource.begin();
        debug!("Fetching model");
        match self.source.get_model(&self.id).await {
            Ok(model) => self.set_model(model),
            Err(e) => self.resource.fail(on_failure, &e),
        }
    }

    /// Applies a model that arrived from outside the fetch path.
    pub fn set_model(&mut self, model: S::Model) {
        self.resource.replace(model, true);
        if let Some(model) = self.resource.model() {
            hooks::run(&self.hooks.before_model_loaded, model);
        }
        self.resource.succeed();
        self.resource.emit(ControllerEvent::Loaded);
        info!(id = %self.id, "Model loaded");
    }

    pub(crate) fn record_failure(&mut self, kind: ControllerErrorKind, cause: &SourceError) {
        self.resource.fail(kind, cause);
    }

    pub fn id(&self) -> &S::Id {
        &self.id
    }

    pub fn model(&self) -> Option<&S::Model> {
        self.resource.model()
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
