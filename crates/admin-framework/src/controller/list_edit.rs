//! # List-Edit Controller
//!
//! A list of sub-resources that belongs to a parent model (an article's
//! comments, a user's sessions). The parent is loaded first; the list only
//! loads once the parent is available.

use crate::controller::list::ListController;
use crate::controller::resource::Resource;
use crate::error::ControllerErrorKind;
use crate::events::ControllerEvent;
use crate::hooks::{self, Hook};
use crate::source::{ListSource, ResourceSource};
use tokio::sync::broadcast;
use tracing::{info, instrument};

pub struct ListEditController<P: ResourceSource, L: ListSource> {
    parent_source: P,
    parent_id: P::Id,
    parent: Resource<P::Model>,
    before_model_loaded: Option<Hook<P::Model>>,
    list: ListController<L>,
}

impl<P: ResourceSource, L: ListSource> ListEditController<P, L> {
    pub fn new(parent_source: P, parent_id: P::Id, list_source: L) -> Self {
        Self {
            parent_source,
            parent_id,
            parent: Resource::new(None),
            before_model_loaded: None,
            list: ListController::new(list_source),
        }
    }

    pub fn before_model_loaded(mut self, hook: impl Fn(&P::Model) + Send + Sync + 'static) -> Self {
        self.before_model_loaded = Some(Box::new(hook));
        self
    }

    #[instrument(skip(self), fields(parent_id = %self.parent_id))]
    pub async fn initialize(&mut self) {
        self.parent.begin();
        match self.parent_source.get_model(&self.parent_id).await {
            Ok(model) => {
                self.parent.replace(model, true);
                if let Some(model) = self.parent.model() {
                    hooks::run(&self.before_model_loaded, model);
                }
                self.parent.succeed();
                info!("Parent model loaded");
                self.parent.emit(ControllerEvent::Loaded);
                self.list.initialize().await;
            }
            Err(e) => self
                .parent
                .fail(ControllerErrorKind::FailedToLoadModel, &e),
        }
    }

    pub fn parent(&self) -> Option<&P::Model> {
        self.parent.model()
    }

    pub fn parent_error(&self) -> bool {
        self.parent.error()
    }

    pub fn parent_loading(&self) -> bool {
        self.parent.loading()
    }

    /// Parent lifecycle events (`Loaded`). List events come from `list().subscribe()`.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.parent.subscribe()
    }

    pub fn list(&self) -> &ListController<L> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<L> {
        &mut self.list
    }
}
