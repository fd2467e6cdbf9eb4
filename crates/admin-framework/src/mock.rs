//! # Mock Sources & Testing Guide
//!
//! [`MockSource`] and [`MockListSource`] implement the source traits entirely
//! in memory. Queue the responses a test needs, hand a clone to the
//! controller under test, then call `verify()` to check every queued response
//! was consumed. [`RecordingSink`] captures notifications instead of showing
//! them.
//!
//! ## When to use mocks vs a live backend
//!
//! | | Mock sources | `ApiClient` + `wiremock` |
//! |---|---|---|
//! | **Speed** | Instant | Fast, but binds a local port |
//! | **Covers** | Controller state machines | Headers, envelopes, status mapping |
//! | **Error injection** | `return_err` | Response templates |
//!
//! ## Example
//!
//! ```rust
//! use admin_framework::controller::EditController;
//! use admin_framework::mock::MockSource;
//! use admin_framework::SourceError;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockSource::<String>::new();
//!     mock.expect_get().return_ok("draft".to_string());
//!     mock.expect_update().return_err(SourceError::Custom("conflict".into()));
//!
//!     let mut controller = EditController::new(mock.clone(), 1);
//!     controller.initialize().await;
//!     controller.update().await;
//!
//!     assert!(controller.error());
//!     mock.verify();
//! }
//! ```

use crate::envelope::ListPage;
use crate::error::SourceError;
use crate::notification::{Notification, NotificationSink};
use crate::query::PageQuery;
use crate::source::{ListSource, ResourceSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// SINGLE-MODEL SOURCE
// =============================================================================

enum Expectation<T> {
    Get {
        response: Result<T, SourceError>,
        delay: Option<Duration>,
    },
    Create {
        response: Result<T, SourceError>,
    },
    Update {
        response: Result<T, SourceError>,
    },
}

struct MockState<T> {
    expectations: VecDeque<Expectation<T>>,
    requested_ids: Vec<u64>,
    created: Vec<T>,
    updated: Vec<T>,
}

/// In-memory [`ResourceSource`] keyed by `u64` ids. Clones share state.
pub struct MockSource<T> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T> Clone for MockSource<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for MockSource<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                requested_ids: Vec::new(),
                created: Vec::new(),
                updated: Vec::new(),
            })),
        }
    }
}

impl<T: Clone> MockSource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            state: Arc::clone(&self.state),
            delay: None,
        }
    }

    pub fn expect_create(&self) -> WriteExpectationBuilder<T> {
        WriteExpectationBuilder {
            state: Arc::clone(&self.state),
            create: true,
        }
    }

    pub fn expect_update(&self) -> WriteExpectationBuilder<T> {
        WriteExpectationBuilder {
            state: Arc::clone(&self.state),
            create: false,
        }
    }

    pub fn requested_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().requested_ids.clone()
    }

    pub fn created_models(&self) -> Vec<T> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updated_models(&self) -> Vec<T> {
        self.state.lock().unwrap().updated.clone()
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.state.lock().unwrap().expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn pop(&self) -> Option<Expectation<T>> {
        self.state.lock().unwrap().expectations.pop_front()
    }
}

#[async_trait]
impl<T> ResourceSource for MockSource<T>
where
    T: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    type Id = u64;
    type Model = T;

    async fn get_model(&self, id: &u64) -> Result<T, SourceError> {
        self.state.lock().unwrap().requested_ids.push(*id);
        match self.pop() {
            Some(Expectation::Get { response, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            _ => panic!("Unexpected get_model({}) or expectation mismatch", id),
        }
    }

    async fn create_model(&self, model: &T) -> Result<T, SourceError> {
        self.state.lock().unwrap().created.push(model.clone());
        match self.pop() {
            Some(Expectation::Create { response }) => response,
            _ => panic!("Unexpected create_model or expectation mismatch"),
        }
    }

    async fn update_model(&self, id: &u64, model: &T) -> Result<T, SourceError> {
        self.state.lock().unwrap().updated.push(model.clone());
        match self.pop() {
            Some(Expectation::Update { response }) => response,
            _ => panic!("Unexpected update_model({}) or expectation mismatch", id),
        }
    }
}

/// Builder for `get_model` expectations.
pub struct GetExpectationBuilder<T> {
    state: Arc<Mutex<MockState<T>>>,
    delay: Option<Duration>,
}

impl<T> GetExpectationBuilder<T> {
    /// Answers only after `delay`, to exercise the loading deadline.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: SourceError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, SourceError>) {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push_back(Expectation::Get {
                response,
                delay: self.delay,
            });
    }
}

/// Builder for `create_model` / `update_model` expectations.
pub struct WriteExpectationBuilder<T> {
    state: Arc<Mutex<MockState<T>>>,
    create: bool,
}

impl<T> WriteExpectationBuilder<T> {
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: SourceError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, SourceError>) {
        let expectation = if self.create {
            Expectation::Create { response }
        } else {
            Expectation::Update { response }
        };
        self.state
            .lock()
            .unwrap()
            .expectations
            .push_back(expectation);
    }
}

// =============================================================================
// LIST SOURCE
// =============================================================================

struct ListState<T> {
    expectations: VecDeque<Result<ListPage<T>, SourceError>>,
    fallback: Option<ListPage<T>>,
    queries: Vec<PageQuery>,
}

/// In-memory [`ListSource`]. Records every query it receives.
///
/// Queued expectations are answered first; once they run out, the fallback
/// page (if any) answers every further call.
pub struct MockListSource<T> {
    state: Arc<Mutex<ListState<T>>>,
}

impl<T> Clone for MockListSource<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for MockListSource<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ListState {
                expectations: VecDeque::new(),
                fallback: None,
                queries: Vec::new(),
            })),
        }
    }
}

impl<T: Clone> MockListSource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(self, page: ListPage<T>) -> Self {
        self.state.lock().unwrap().fallback = Some(page);
        self
    }

    pub fn expect_list(&self) -> ListExpectationBuilder<T> {
        ListExpectationBuilder {
            state: Arc::clone(&self.state),
        }
    }

    pub fn queries(&self) -> Vec<PageQuery> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().queries.len()
    }

    pub fn verify(&self) {
        let remaining = self.state.lock().unwrap().expectations.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

#[async_trait]
impl<T> ListSource for MockListSource<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    type Item = T;

    async fn get_list(&self, query: &PageQuery) -> Result<ListPage<T>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.clone());
        if let Some(response) = state.expectations.pop_front() {
            return response;
        }
        match &state.fallback {
            Some(page) => Ok(page.clone()),
            None => panic!("Unexpected get_list({:?}) with no expectation left", query),
        }
    }
}

pub struct ListExpectationBuilder<T> {
    state: Arc<Mutex<ListState<T>>>,
}

impl<T> ListExpectationBuilder<T> {
    pub fn return_ok(self, page: ListPage<T>) {
        self.state.lock().unwrap().expectations.push_back(Ok(page));
    }

    pub fn return_err(self, error: SourceError) {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push_back(Err(error));
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Sink that remembers everything it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
