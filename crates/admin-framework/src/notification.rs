//! # Notifications
//!
//! User-facing messages produced by the backend (inside response envelopes)
//! and by the error reporter. Anything that can show a message implements
//! [`NotificationSink`]; [`NotificationCenter`] is the default sink, which logs
//! every message and rebroadcasts it to subscribers.

use crate::events::EventBus;
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Severity of a notification.
///
/// The backend may send either the lowercase name or a numeric code
/// (`0` info, `1` success, `2` warning, `3` error). Anything else reads as info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn from_code(code: u64) -> Self {
        match code {
            1 => NotificationKind::Success,
            2 => NotificationKind::Warning,
            3 => NotificationKind::Error,
            _ => NotificationKind::Info,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "success" => NotificationKind::Success,
            "warning" | "warn" => NotificationKind::Warning,
            "error" | "danger" => NotificationKind::Error,
            _ => NotificationKind::Info,
        }
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u64),
            Name(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Code(code)) => NotificationKind::from_code(code),
            Some(Raw::Name(name)) => NotificationKind::from_name(&name),
            None => NotificationKind::Info,
        })
    }
}

/// A notification as it appears on the wire under `meta.notifications`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct NotificationResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: NotificationKind,
}

/// A message ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

impl From<&NotificationResponse> for Notification {
    fn from(response: &NotificationResponse) -> Self {
        Notification::new(
            response.title.clone().unwrap_or_default(),
            response.message.clone().unwrap_or_default(),
            response.status,
        )
    }
}

/// Anything able to display notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);

    fn error(&self, title: &str, message: &str) {
        self.notify(Notification::new(title, message, NotificationKind::Error));
    }

    fn success(&self, title: &str, message: &str) {
        self.notify(Notification::new(title, message, NotificationKind::Success));
    }

    /// Shows every notification the backend attached to a response.
    fn handle_response(&self, notifications: &[NotificationResponse]) {
        for notification in notifications {
            self.notify(notification.into());
        }
    }

    /// Like [`NotificationSink::handle_response`], keeping only successes.
    fn handle_success(&self, notifications: &[NotificationResponse]) {
        for notification in notifications
            .iter()
            .filter(|n| n.status == NotificationKind::Success)
        {
            self.notify(notification.into());
        }
    }
}

/// Commands understood by notification displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationCommand {
    Show(Notification),
    ClearAll,
}

/// Logs notifications and rebroadcasts them to any display that subscribed.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    bus: EventBus<NotificationCommand>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationCommand> {
        self.bus.subscribe()
    }

    pub fn clear_all(&self) {
        self.bus.publish(NotificationCommand::ClearAll);
    }
}

impl NotificationSink for NotificationCenter {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error | NotificationKind::Warning => warn!(
                kind = ?notification.kind,
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
            _ => info!(
                kind = ?notification.kind,
                title = %notification.title,
                message = %notification.message,
                "Notification"
            ),
        }
        self.bus.publish(NotificationCommand::Show(notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accepts_names_and_codes() {
        let parsed: Vec<NotificationResponse> = serde_json::from_str(
            r#"[{"status": "success"}, {"status": 3}, {"status": "nonsense"}, {}]"#,
        )
        .unwrap();
        let kinds: Vec<_> = parsed.iter().map(|n| n.status).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Success,
                NotificationKind::Error,
                NotificationKind::Info,
                NotificationKind::Info
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_success_filters_other_kinds() {
        let center = NotificationCenter::new();
        let mut display = center.subscribe();

        center.handle_success(&[
            NotificationResponse {
                title: Some("Saved".into()),
                message: None,
                status: NotificationKind::Success,
            },
            NotificationResponse {
                title: Some("Heads up".into()),
                message: None,
                status: NotificationKind::Warning,
            },
        ]);
        center.clear_all();

        match display.recv().await.unwrap() {
            NotificationCommand::Show(n) => assert_eq!(n.title, "Saved"),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(display.recv().await.unwrap(), NotificationCommand::ClearAll);
    }
}
