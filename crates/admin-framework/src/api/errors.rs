//! # Error Reporter
//!
//! Turns HTTP failures into user-facing notifications. Field validation
//! errors win over the status-code message; anything else gets the common
//! title and message. All texts come from a translation table with English
//! fallbacks.

use crate::error::ApiError;
use crate::notification::NotificationSink;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessages {
    pub common_title: String,
    pub common_message: String,
    pub e401: String,
    pub e403: String,
    pub e404: String,
    pub e500: String,
    pub no_file: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            common_title: "Error".to_string(),
            common_message: "Something went wrong. Please try again later.".to_string(),
            e401: "Your session has expired. Please sign in again.".to_string(),
            e403: "You are not allowed to do this.".to_string(),
            e404: "The requested item could not be found.".to_string(),
            e500: "The server could not complete the request.".to_string(),
            no_file: "The server did not send a file.".to_string(),
        }
    }
}

impl ErrorMessages {
    /// Reads `errors.common.*` keys, falling back to the English defaults.
    pub fn from_translations(table: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            table
                .get(&format!("errors.common.{}", key))
                .cloned()
                .unwrap_or(fallback)
        };
        Self {
            common_title: pick("title", defaults.common_title),
            common_message: pick("message", defaults.common_message),
            e401: pick("e401", defaults.e401),
            e403: pick("e403", defaults.e403),
            e404: pick("e404", defaults.e404),
            e500: pick("e500", defaults.e500),
            no_file: pick("no-file", defaults.no_file),
        }
    }

    fn for_status(&self, status: u16) -> Option<&str> {
        match status {
            401 => Some(&self.e401),
            403 => Some(&self.e403),
            404 => Some(&self.e404),
            500 => Some(&self.e500),
            _ => None,
        }
    }
}

pub struct ErrorReporter {
    show_notifications: bool,
    messages: RwLock<ErrorMessages>,
    sink: Arc<dyn NotificationSink>,
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn NotificationSink>, show_notifications: bool) -> Self {
        Self {
            show_notifications,
            messages: RwLock::new(ErrorMessages::default()),
            sink,
        }
    }

    /// Swaps in messages for a newly selected language.
    pub fn set_translations(&self, table: &HashMap<String, String>) {
        let mut messages = self.messages.write().unwrap_or_else(PoisonError::into_inner);
        *messages = ErrorMessages::from_translations(table);
    }

    pub fn report(&self, error: &ApiError) {
        if !self.show_notifications {
            debug!(error = %error, "Notifications disabled, error not shown");
            return;
        }
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(fields) = error.field_errors() {
            let mut shown = 0;
            for (field, first) in fields
                .iter()
                .filter_map(|(field, msgs)| msgs.first().map(|m| (field, m)))
            {
                self.sink.error(field, first);
                shown += 1;
            }
            if shown > 0 {
                return;
            }
        }

        match error.status() {
            Some(status) => match messages.for_status(status.as_u16()) {
                Some(message) => self.sink.error(&status.as_u16().to_string(), message),
                None => self
                    .sink
                    .error(&messages.common_title, &messages.common_message),
            },
            None => self
                .sink
                .error(&messages.common_title, &messages.common_message),
        }
    }

    /// Raised when a download response carried no file.
    pub fn common_error(&self) {
        if !self.show_notifications {
            return;
        }
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        self.sink.error(&messages.common_title, &messages.no_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrors;
    use crate::mock::RecordingSink;
    use reqwest::StatusCode;

    fn http(status: StatusCode, field_errors: FieldErrors) -> ApiError {
        ApiError::Http {
            status,
            field_errors,
            body: String::new(),
        }
    }

    #[test]
    fn test_field_errors_take_precedence() {
        let sink = Arc::new(RecordingSink::new());
        let reporter = ErrorReporter::new(sink.clone(), true);
        let fields = FieldErrors::from([
            ("email".to_string(), vec!["is taken".to_string(), "ignored".to_string()]),
            ("name".to_string(), vec!["is required".to_string()]),
        ]);

        reporter.report(&http(StatusCode::UNPROCESSABLE_ENTITY, fields));

        let shown = sink.notifications();
        assert_eq!(shown.len(), 2);
        assert_eq!((shown[0].title.as_str(), shown[0].message.as_str()), ("email", "is taken"));
        assert_eq!(shown[1].title, "name");
    }

    #[test]
    fn test_status_mapping_and_common_fallback() {
        let sink = Arc::new(RecordingSink::new());
        let reporter = ErrorReporter::new(sink.clone(), true);
        reporter.set_translations(&HashMap::from([(
            "errors.common.e404".to_string(),
            "Nincs ilyen".to_string(),
        )]));

        reporter.report(&http(StatusCode::NOT_FOUND, FieldErrors::new()));
        reporter.report(&http(StatusCode::BAD_GATEWAY, FieldErrors::new()));
        reporter.report(&ApiError::Request("connection refused".into()));

        let shown = sink.notifications();
        assert_eq!((shown[0].title.as_str(), shown[0].message.as_str()), ("404", "Nincs ilyen"));
        assert_eq!(shown[1].title, ErrorMessages::default().common_title);
        assert_eq!(shown[2].message, ErrorMessages::default().common_message);
    }

    #[test]
    fn test_disabled_reporter_stays_silent() {
        let sink = Arc::new(RecordingSink::new());
        let reporter = ErrorReporter::new(sink.clone(), false);
        reporter.report(&http(StatusCode::INTERNAL_SERVER_ERROR, FieldErrors::new()));
        reporter.common_error();
        assert!(sink.notifications().is_empty());
    }
}
