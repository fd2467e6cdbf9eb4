//! # Resource State
//!
//! The state every controller carries: the current model, a snapshot taken
//! when it was loaded, the loading flag and the error flag.
//!
//! ```text
//! Idle ──begin──▶ Loading ──succeed──▶ Ready
//!                    │                   │
//!                    └──fail──▶ Failed ◀─┘ (via begin/fail)
//! ```
//!
//! `fail` always lowers the loading flag. `begin` leaves a previous error
//! visible until the next outcome, so during a retry `error` and `loading`
//! can both be true.
//!
//! Only the dirty check needs `PartialEq`; list pages are held without it.

use crate::error::{ControllerErrorKind, SourceError};
use crate::events::{ControllerEvent, EventBus};
use crate::loading::LoadingGuard;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct Resource<T> {
    model: Option<T>,
    baseline: Option<T>,
    state: LifecycleState,
    error: bool,
    error_kind: Option<ControllerErrorKind>,
    loading: LoadingGuard,
    events: EventBus<ControllerEvent>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> Resource<T> {
    pub fn new(model: Option<T>) -> Self {
        Self {
            model,
            baseline: None,
            state: LifecycleState::Idle,
            error: false,
            error_kind: None,
            loading: LoadingGuard::new(),
            events: EventBus::default(),
        }
    }

    pub fn set_loading_timeout(&mut self, timeout: Duration) {
        self.loading = LoadingGuard::with_timeout(timeout);
    }

    pub fn model(&self) -> Option<&T> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut T> {
        self.model.as_mut()
    }

    pub fn baseline(&self) -> Option<&T> {
        self.baseline.as_ref()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn error(&self) -> bool {
        self.error
    }

    pub fn error_kind(&self) -> Option<ControllerErrorKind> {
        self.error_kind
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: ControllerEvent) {
        self.events.publish(event);
    }

    pub(crate) fn begin(&mut self) {
        self.state = LifecycleState::Loading;
        self.loading.start_loading();
    }

    pub(crate) fn succeed(&mut self) {
        self.error = false;
        self.error_kind = None;
        self.state = LifecycleState::Ready;
        self.loading.stop_loading();
    }

    /// Records the failure and publishes [`ControllerEvent::Failed`].
    pub(crate) fn fail(&mut self, kind: ControllerErrorKind, cause: &SourceError) {
        warn!(error = %cause, kind = %kind, "Controller operation failed");
        self.loading.stop_loading();
        self.error = true;
        self.error_kind = Some(kind);
        self.state = LifecycleState::Failed;
        self.emit(ControllerEvent::Failed(kind));
    }
}

impl<T: Clone> Resource<T> {
    /// Replaces the model without touching the lifecycle state.
    pub(crate) fn replace(&mut self, model: T, snapshot: bool) {
        if snapshot {
            self.baseline = Some(model.clone());
        }
        self.model = Some(model);
    }
}

impl<T: PartialEq> Resource<T> {
    /// True while the model equals the snapshot taken at load time.
    pub fn no_change(&self) -> bool {
        self.model == self.baseline
    }
}
