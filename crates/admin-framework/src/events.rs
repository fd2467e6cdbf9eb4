//! # Event Buses
//!
//! Controllers, the session guard and the notification center publish through
//! [`EventBus`], a thin wrapper over a tokio broadcast channel. Publishing with
//! no subscribers is not an error; the event is simply dropped.
//!
//! [`CoreEvents`] carries the two application-wide refresh signals that list
//! and detail views subscribe to.

use crate::error::ControllerErrorKind;
use std::fmt::Debug;
use tokio::sync::broadcast;
use tracing::trace;

/// Buffered events per subscriber before the slowest one starts lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Multi-subscriber event channel.
#[derive(Debug)]
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E: Clone + Debug + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl<E: Clone + Debug + Send + 'static> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes to every current subscriber and returns how many received it.
    pub fn publish(&self, event: E) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                trace!(?event, "No subscribers for event");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Lifecycle notifications emitted by controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A model was fetched (or re-fetched) and applied.
    Loaded,
    /// An update round-trip succeeded.
    Updated,
    /// A create round-trip succeeded.
    Created,
    /// A list page was fetched and applied. Carries the reported total.
    ListLoaded { total_items: u64 },
    /// An operation failed; the kind is also on the controller.
    Failed(ControllerErrorKind),
}

/// Application-wide refresh requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreSignal {
    RefreshListView,
    RefreshDetailView,
}

/// Broadcaster for [`CoreSignal`]s. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct CoreEvents {
    bus: EventBus<CoreSignal>,
}

impl CoreEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_list_view(&self) -> usize {
        self.bus.publish(CoreSignal::RefreshListView)
    }

    pub fn refresh_detail_view(&self) -> usize {
        self.bus.publish(CoreSignal::RefreshDetailView)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoreSignal> {
        self.bus.subscribe()
    }
}
