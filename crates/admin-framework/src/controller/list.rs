//! # List Controller
//!
//! Paged, filtered and ordered list view. Every mutation of page, filters or
//! orders that is not a `_no_refresh` variant triggers exactly one reload,
//! and each reload rebuilds the [`PageQuery`] from scratch.
//!
//! Reloads take `&mut self`, so a controller never has two of its own
//! requests in flight: responses are applied in the order they were asked
//! for. Pushed updates from [`ListController::watch_list_changes`] are applied
//! whenever they arrive.

use crate::controller::resource::{LifecycleState, Resource};
use crate::envelope::ListPage;
use crate::error::{ControllerErrorKind, SourceError};
use crate::events::{ControllerEvent, CoreSignal};
use crate::query::PageQuery;
use crate::sortable::{Filter, Order, SortDirection};
use crate::source::ListSource;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_PAGE_INDEX: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TOTAL_ITEMS: u64 = 0;
pub const PAGE_SIZE_LIMITS: [u32; 4] = [5, 10, 25, 50];

pub type ListChanges<T> = mpsc::Receiver<Result<ListPage<T>, SourceError>>;

/// Pagination state shown by the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            current_page: DEFAULT_PAGE_INDEX,
            items_per_page: DEFAULT_PAGE_SIZE,
            total_items: DEFAULT_TOTAL_ITEMS,
        }
    }
}

impl Paginator {
    pub fn limits(&self) -> &'static [u32] {
        &PAGE_SIZE_LIMITS
    }
}

pub struct ListController<L: ListSource> {
    source: L,
    resource: Resource<Vec<L::Item>>,
    paginator: Paginator,
    search_text: Option<String>,
    filters: Vec<Filter>,
    orders: Vec<Order>,
    changes: Option<ListChanges<L::Item>>,
}

impl<L: ListSource> ListController<L> {
    pub fn new(source: L) -> Self {
        Self {
            source,
            resource: Resource::new(None),
            paginator: Paginator::default(),
            search_text: None,
            filters: Vec::new(),
            orders: Vec::new(),
            changes: None,
        }
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.paginator.items_per_page = size;
        self
    }

    pub fn with_loading_timeout(mut self, timeout: Duration) -> Self {
        self.resource.set_loading_timeout(timeout);
        self
    }

    pub async fn initialize(&mut self) {
        self.load_list().await;
    }

    /// The query the next reload will send.
    pub fn query(&self) -> PageQuery {
        PageQuery::build(
            self.paginator.current_page,
            self.paginator.items_per_page,
            self.search_text.as_deref(),
            &self.orders,
            &self.filters,
        )
    }

    #[instrument(skip(self), fields(page = self.paginator.current_page))]
    pub async fn load_list(&mut self) {
        self.resource.begin();
        let query = self.query();
        debug!(?query, "Fetching list");
        match self.source.get_list(&query).await {
            Ok(page) => self.set_list(page),
            Err(e) => self
                .resource
                .fail(ControllerErrorKind::FailedToLoadList, &e),
        }
    }

    fn set_list(&mut self, page: ListPage<L::Item>) {
        let total_items = page.count;
        let len = page.data.len();
        self.resource.replace(page.data, false);
        self.paginator.total_items = total_items;
        self.resource.succeed();
        info!(items = len, total_items, "List loaded");
        self.resource
            .emit(ControllerEvent::ListLoaded { total_items });
    }

    // --- search ---

    pub fn set_search_text(&mut self, text: Option<String>) {
        self.search_text = text;
    }

    /// Reloads after the search text changed.
    pub async fn on_change(&mut self) {
        self.load_list().await;
    }

    // --- pagination ---

    pub async fn page_change(&mut self, page: u32) {
        self.paginator.current_page = page;
        self.load_list().await;
    }

    /// Page event from a zero-based pager widget.
    pub async fn mat_page_change(&mut self, page_index: u32, page_size: u32, length: u64) {
        self.paginator.current_page = page_index.saturating_add(1);
        self.paginator.items_per_page = page_size;
        self.paginator.total_items = length;
        self.load_list().await;
    }

    // --- filters ---

    pub fn add_or_update_filter_no_refresh(&mut self, filter: Filter) {
        self.filters.retain(|f| f.key != filter.key);
        self.filters.push(filter);
    }

    pub async fn add_or_update_filter(&mut self, filter: Filter) {
        self.add_or_update_filter_no_refresh(filter);
        self.load_list().await;
    }

    pub fn remove_filter_no_refresh(&mut self, key: &str) {
        self.filters.retain(|f| f.key != key);
    }

    pub async fn remove_filter(&mut self, key: &str) {
        self.remove_filter_no_refresh(key);
        self.load_list().await;
    }

    pub async fn clear_filter(&mut self) {
        self.filters.clear();
        self.load_list().await;
    }

    /// Replaces the whole filter set.
    pub async fn filter_change(&mut self, filters: Vec<Filter>) {
        self.filters.clear();
        for filter in filters {
            self.add_or_update_filter_no_refresh(filter);
        }
        self.load_list().await;
    }

    // --- orders ---

    /// Sorts by one column only.
    pub async fn set_single_order(&mut self, column: &str, direction: SortDirection) {
        self.orders = vec![Order::new(column, direction)];
        self.load_list().await;
    }

    pub async fn clear_order(&mut self) {
        self.orders.clear();
        self.load_list().await;
    }

    /// Replaces the whole order set, e.g. with the output of `SortableColumns`.
    pub async fn order_change(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.load_list().await;
    }

    // --- pushed updates ---

    pub fn watch_list_changes(&mut self, changes: ListChanges<L::Item>) {
        self.changes = Some(changes);
    }

    /// Waits for the next pushed page and applies it. `false` once the stream closed.
    pub async fn next_list_change(&mut self) -> bool {
        let Some(changes) = self.changes.as_mut() else {
            return false;
        };
        match changes.recv().await {
            Some(Ok(page)) => {
                self.set_list(page);
                true
            }
            Some(Err(e)) => {
                self.resource
                    .fail(ControllerErrorKind::FailedToRefreshList, &e);
                true
            }
            None => {
                self.changes = None;
                false
            }
        }
    }

    /// Waits for the next list refresh signal and reloads. `false` once the bus closed.
    pub async fn reload_on(&mut self, signals: &mut broadcast::Receiver<CoreSignal>) -> bool {
        loop {
            match signals.recv().await {
                Ok(CoreSignal::RefreshListView) => {
                    self.load_list().await;
                    return true;
                }
                Ok(CoreSignal::RefreshDetailView) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Refresh signals lagged, reloading once");
                    self.load_list().await;
                    return true;
                }
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    // --- accessors ---

    pub fn list(&self) -> &[L::Item] {
        self.resource.model().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn loading(&self) -> bool {
        self.resource.loading()
    }

    pub fn error(&self) -> bool {
        self.resource.error()
    }

    pub fn error_kind(&self) -> Option<ControllerErrorKind> {
        self.resource.error_kind()
    }

    pub fn state(&self) -> LifecycleState {
        self.resource.state()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.resource.subscribe()
    }
}
