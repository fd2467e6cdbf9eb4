//! # Response Envelope
//!
//! Every backend response wraps its payload as `{ data, meta }`, where `meta`
//! may carry pagination and notifications. [`unwrap_envelope`] hands any
//! notifications to a [`NotificationSink`] and returns the payload together
//! with the pagination block (defaults when absent).

use crate::notification::{NotificationResponse, NotificationSink};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub notifications: Option<Vec<NotificationResponse>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Pagination {
    pub count: u64,
    #[serde(alias = "currentPage")]
    pub current_page: u64,
    #[serde(alias = "perPage")]
    pub per_page: u64,
    pub total: u64,
    #[serde(alias = "totalPages")]
    pub total_pages: u64,
    pub links: serde_json::Value,
}

/// Payload of an envelope after its notifications were dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct Unwrapped<T> {
    pub data: T,
    pub pagination: Pagination,
}

/// One page of a list: its items plus the total the server reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    pub count: u64,
}

impl<T> ListPage<T> {
    pub fn new(data: Vec<T>, count: u64) -> Self {
        Self { data, count }
    }
}

impl<T> From<Unwrapped<Vec<T>>> for ListPage<T> {
    fn from(unwrapped: Unwrapped<Vec<T>>) -> Self {
        ListPage::new(unwrapped.data, unwrapped.pagination.total)
    }
}

pub fn unwrap_envelope<T>(envelope: Envelope<T>, sink: &dyn NotificationSink) -> Unwrapped<T> {
    let meta = envelope.meta.unwrap_or_default();
    if let Some(notifications) = meta.notifications.as_deref() {
        sink.handle_response(notifications);
    }
    Unwrapped {
        data: envelope.data,
        pagination: meta.pagination.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingSink;
    use crate::notification::NotificationKind;

    #[test]
    fn test_list_envelope_with_pagination_and_notifications() {
        let raw = r#"{
            "data": [1, 2, 3],
            "meta": {
                "pagination": {"count": 3, "current_page": 2, "per_page": 3, "total": 42, "total_pages": 14},
                "notifications": [{"title": "Hello", "message": "World", "status": "success"}]
            }
        }"#;
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(raw).unwrap();
        let sink = RecordingSink::new();

        let page: ListPage<u32> = unwrap_envelope(envelope, &sink).into();

        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.count, 42);
        let shown = sink.notifications();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].kind, NotificationKind::Success);
    }

    #[test]
    fn test_missing_meta_defaults_total_to_zero() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        let sink = RecordingSink::new();

        let page: ListPage<u32> = unwrap_envelope(envelope, &sink).into();

        assert_eq!(page.count, 0);
        assert!(sink.notifications().is_empty());
    }
}
