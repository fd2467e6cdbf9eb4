//! Open/closed state for views hosted in a dialog.

use crate::events::ControllerEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Waits for the hosted controller's next save outcome. A successful
    /// create or update closes the dialog; a failure leaves it open so the
    /// error can be shown. Returns whether the dialog was closed.
    pub async fn close_on_success(&mut self, events: &mut broadcast::Receiver<ControllerEvent>) -> bool {
        loop {
            match events.recv().await {
                Ok(ControllerEvent::Created | ControllerEvent::Updated) => {
                    self.close();
                    return true;
                }
                Ok(ControllerEvent::Failed(kind)) => {
                    debug!(%kind, "Save failed, dialog stays open");
                    return false;
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dialog missed controller events");
                    continue;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::CreateController;
    use crate::error::SourceError;
    use crate::mock::MockSource;
    use std::time::Duration;

    #[tokio::test]
    async fn test_modal_closes_after_create() {
        let mock = MockSource::<u32>::new();
        mock.expect_create().return_ok(1);
        let mut controller = CreateController::new(mock, 0);
        let mut events = controller.subscribe();

        let mut modal = ModalState::new();
        modal.open();
        controller.create(1).await;
        assert!(modal.close_on_success(&mut events).await);

        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn test_modal_stays_open_after_failed_create() {
        let mock = MockSource::<u32>::new();
        mock.expect_create()
            .return_err(SourceError::Custom("boom".to_string()));
        let mut controller = CreateController::new(mock, 0);
        let mut events = controller.subscribe();

        let mut modal = ModalState::new();
        modal.open();
        controller.create(1).await;
        let closed = tokio::time::timeout(Duration::from_secs(2), modal.close_on_success(&mut events))
            .await
            .expect("failure event should end the wait");

        assert!(!closed);
        assert!(modal.is_open());
        assert!(controller.error());
    }

    #[tokio::test]
    async fn test_modal_skips_lagged_events() {
        let bus = crate::events::EventBus::new(1);
        let mut events = bus.subscribe();
        bus.publish(ControllerEvent::Loaded);
        bus.publish(ControllerEvent::Loaded);
        bus.publish(ControllerEvent::Updated);

        let mut modal = ModalState::new();
        modal.open();

        assert!(modal.close_on_success(&mut events).await);
        assert!(!modal.is_open());
    }
}
