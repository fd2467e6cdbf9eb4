//! # Detail Controller
//!
//! A [`ShowController`] that also follows an external "model changed" stream.
//! Each item on the stream is applied like a fresh load; a failed item is
//! recorded as [`ControllerErrorKind::FailedToRefreshModel`].

use crate::controller::show::ShowController;
use crate::error::{ControllerErrorKind, SourceError};
use crate::source::ResourceSource;
use std::ops::{Deref, DerefMut};
use tokio::sync::mpsc;
use tracing::debug;

pub type ModelChanges<T> = mpsc::Receiver<Result<T, SourceError>>;

pub struct DetailController<S: ResourceSource> {
    show: ShowController<S>,
    changes: Option<ModelChanges<S::Model>>,
}

impl<S: ResourceSource> DetailController<S> {
    pub fn new(source: S, id: S::Id) -> Self {
        Self {
            show: ShowController::new(source, id),
            changes: None,
        }
    }

    pub fn from_show(show: ShowController<S>) -> Self {
        Self {
            show,
            changes: None,
        }
    }

    /// Subscribes to pushed model updates, replacing any earlier stream.
    pub fn watch_changes(&mut self, changes: ModelChanges<S::Model>) {
        self.changes = Some(changes);
    }

    /// Waits for the next pushed update and applies it.
    ///
    /// Returns `false` once the stream is closed (or none was attached).
    pub async fn next_change(&mut self) -> bool {
        let Some(changes) = self.changes.as_mut() else {
            return false;
        };
        match changes.recv().await {
            Some(Ok(model)) => {
                debug!(id = %self.show.id(), "Applying pushed model change");
                self.show.set_model(model);
                true
            }
            Some(Err(e)) => {
                self.show
                    .record_failure(ControllerErrorKind::FailedToRefreshModel, &e);
                true
            }
            None => {
                self.changes = None;
                false
            }
        }
    }
}

impl<S: ResourceSource> Deref for DetailController<S> {
    type Target = ShowController<S>;

    fn deref(&self) -> &Self::Target {
        &self.show
    }
}

impl<S: ResourceSource> DerefMut for DetailController<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.show
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;

    #[tokio::test]
    async fn test_pushed_changes_apply_and_failures_are_recorded() {
        let mock = MockSource::<u32>::new();
        mock.expect_get().return_ok(1);

        let (tx, rx) = mpsc::channel(4);
        let mut controller = DetailController::new(mock.clone(), 7);
        controller.watch_changes(rx);
        controller.initialize().await;

        tx.send(Ok(2)).await.unwrap();
        assert!(controller.next_change().await);
        assert_eq!(controller.model(), Some(&2));

        tx.send(Err(SourceError::Custom("stream broke".into())))
            .await
            .unwrap();
        assert!(controller.next_change().await);
        assert_eq!(controller.model(), Some(&2));
        assert_eq!(
            controller.error_kind(),
            Some(ControllerErrorKind::FailedToRefreshModel)
        );

        drop(tx);
        assert!(!controller.next_change().await);
        mock.verify();
    }
}
