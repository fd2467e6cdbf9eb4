//! # Admin Framework
//!
//! Building blocks for admin-style clients of a REST backend: view
//! controllers that own the load/edit/create/list lifecycle of a resource,
//! a session guard that keeps the OAuth token fresh, and an HTTP boundary
//! that unwraps the backend's response envelope.
//!
//! ## Architecture Overview
//!
//! 1. **Source Layer** ([`ResourceSource`], [`ListSource`]) - how a resource
//!    is fetched, created, updated and listed. [`api::RestSource`] is the
//!    REST implementation; [`mock`] has in-memory ones for tests.
//! 2. **Controller Layer** ([`controller`]) - per-view state machines:
//!    model, loaded snapshot, `loading`/`error` flags, pagination, filters,
//!    orders. Failures become state; nothing is thrown at the view.
//! 3. **Session Layer** ([`session`], [`auth`]) - token persistence, the
//!    *nearly expired* warning and the refresher loop that answers it.
//!
//! ## Example
//!
//! ```rust
//! use admin_framework::controller::ListController;
//! use admin_framework::envelope::ListPage;
//! use admin_framework::mock::MockListSource;
//! use admin_framework::sortable::Filter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = MockListSource::new().with_fallback(ListPage::new(vec!["a", "b"], 2));
//!     let mut list = ListController::new(source.clone());
//!
//!     list.initialize().await;
//!     list.add_or_update_filter(Filter::new("status", "active")).await;
//!
//!     assert_eq!(list.paginator().total_items, 2);
//!     assert_eq!(source.queries()[1].filter.as_ref().map(|f| f.len()), Some(1));
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Controller operations take `&mut self`, so one view never runs two
//!   loads at once and responses are applied in request order.
//! - Timers (loading deadline, token expiry) are single-shot Tokio tasks,
//!   cancelled on re-arm and on drop.
//! - Cross-view signals use broadcast channels ([`events`]); dropping a
//!   receiver unsubscribes.

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod events;
pub mod ext;
pub mod hooks;
pub mod language;
pub mod loading;
pub mod mock;
pub mod notification;
pub mod permission;
pub mod query;
pub mod session;
pub mod sortable;
pub mod source;
pub mod telemetry;
pub mod text;
pub mod translatable;

pub use api::{ApiClient, RestSource};
pub use auth::{AuthGuard, AuthService, SessionRefresher};
pub use config::Environment;
pub use envelope::{Envelope, ListPage};
pub use error::{ApiError, AuthError, ConfigError, ControllerErrorKind, SessionError, SourceError};
pub use loading::LoadingGuard;
pub use notification::{NotificationCenter, NotificationSink};
pub use session::{CookieStore, SessionGuard};
pub use source::{ListSource, ResourceSource};
