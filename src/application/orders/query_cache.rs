//! Filtered, paginated, memoized order listings.
//!
//! [`OrderQueryCache`] owns three pieces of state:
//!
//! - the memo table, `CacheKey -> Arc<OrderPage>`, unbounded for the
//!   session;
//! - the cursor, i.e. the active filters and page;
//! - the [`ListView`] a dashboard renders.
//!
//! Locks are `parking_lot` and never held across an await. A cancelled
//! request touches none of the three.
//!
//! Every presenting load claims a view ticket when it starts. Only the
//! holder of the latest ticket may write the view, so a slow response never
//! replaces what a newer request already put on screen.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::application::abort::AbortSignal;
use crate::domain::{
    filter::{CacheKey, FilterState},
    id::OrderId,
    order::OrderSummary,
    order_number::OrderNumberMap,
    page::{pages_for, OrderPage, PAGE_SIZE},
};
use crate::error::Error;
use crate::port::{ListQuery, OrderApi, OrderListing};

/// Why the displayed list is in an error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListErrorKind {
    /// Network failure or non-2xx status.
    Transport,
    /// The body had no `orders` array or an undecodable order.
    Malformed,
}

/// User-visible listing error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListError {
    pub kind: ListErrorKind,
    pub message: String,
}

impl ListError {
    fn from_error(err: &Error) -> Self {
        match err {
            Error::MalformedResponse(message) => Self {
                kind: ListErrorKind::Malformed,
                message: message.clone(),
            },
            other => Self {
                kind: ListErrorKind::Transport,
                message: format!("Failed to fetch orders: {other}"),
            },
        }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Display state of the order list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub page: u32,
    pub orders: Vec<OrderSummary>,
    pub total_count: u64,
    pub total_pages: u32,
    pub order_numbers: OrderNumberMap,
    pub loading: bool,
    pub error: Option<ListError>,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            page: 1,
            orders: Vec::new(),
            total_count: 0,
            total_pages: 1,
            order_numbers: OrderNumberMap::default(),
            loading: false,
            error: None,
        }
    }
}

impl ListView {
    fn show(&mut self, page: &OrderPage) {
        self.page = page.page;
        self.orders = page.orders.clone();
        self.total_count = page.total_count;
        self.total_pages = page.total_pages;
        self.order_numbers = page.order_numbers.clone();
        self.loading = false;
        self.error = None;
    }

    fn fail(&mut self, page: u32, error: ListError) {
        self.page = page;
        self.orders.clear();
        self.total_count = 0;
        self.total_pages = 1;
        self.order_numbers = OrderNumberMap::default();
        self.loading = false;
        self.error = Some(error);
    }

    #[must_use]
    pub fn order_number(&self, id: &OrderId) -> Option<&str> {
        self.order_numbers.get(id)
    }
}

/// Result of a page request.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// Served from the memo table; no request was made.
    Cached(Arc<OrderPage>),
    /// Fetched and memoized.
    Fetched(Arc<OrderPage>),
    /// The request failed; nothing was memoized.
    Failed(ListError),
    /// Aborted before completion; nothing changed.
    Cancelled,
}

impl PageOutcome {
    #[must_use]
    pub fn page(&self) -> Option<&Arc<OrderPage>> {
        match self {
            Self::Cached(page) | Self::Fetched(page) => Some(page),
            Self::Failed(_) | Self::Cancelled => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ListError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Notification sent whenever the displayed view changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdate {
    pub page: u32,
    /// The change came from a realtime refresh.
    pub realtime: bool,
}

/// Whether a load writes the view, and how the change is announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    Hidden,
    Shown { realtime: bool },
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    filters: FilterState,
    page: u32,
}

/// Memoized, filter-aware order listing.
pub struct OrderQueryCache {
    api: Arc<dyn OrderApi>,
    number_prefix: String,
    pages: RwLock<HashMap<CacheKey, Arc<OrderPage>>>,
    cursor: RwLock<Cursor>,
    view: RwLock<ListView>,
    view_ticket: AtomicU64,
    /// Wrapped in Option to allow construction without notifications.
    tx: Option<broadcast::Sender<ViewUpdate>>,
}

impl OrderQueryCache {
    /// Create a cache starting at page 1 of the default filters.
    #[must_use]
    pub fn new(api: Arc<dyn OrderApi>, number_prefix: impl Into<String>) -> Self {
        Self {
            api,
            number_prefix: number_prefix.into(),
            pages: RwLock::new(HashMap::new()),
            cursor: RwLock::new(Cursor {
                filters: FilterState::default(),
                page: 1,
            }),
            view: RwLock::new(ListView::default()),
            view_ticket: AtomicU64::new(0),
            tx: None,
        }
    }

    /// Create a cache that broadcasts [`ViewUpdate`]s.
    #[must_use]
    pub fn with_notifications(
        api: Arc<dyn OrderApi>,
        number_prefix: impl Into<String>,
        capacity: usize,
    ) -> (Self, broadcast::Receiver<ViewUpdate>) {
        let (tx, rx) = broadcast::channel(capacity);
        let mut cache = Self::new(api, number_prefix);
        cache.tx = Some(tx);
        (cache, rx)
    }

    /// Subscribe to view updates. `None` without notifications.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<ViewUpdate>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }

    /// Page `page` under `filters`, from memo unless `force_refresh`.
    ///
    /// The outcome is presented in the view unless cancelled.
    pub async fn get_page(&self, filters: &FilterState, page: u32, force_refresh: bool) -> PageOutcome {
        self.load(
            filters,
            page,
            force_refresh,
            &AbortSignal::never(),
            Presentation::Shown { realtime: false },
        )
        .await
    }

    /// [`get_page`](Self::get_page) that gives up when `abort` fires.
    pub async fn get_page_with_abort(
        &self,
        filters: &FilterState,
        page: u32,
        force_refresh: bool,
        abort: &AbortSignal,
    ) -> PageOutcome {
        self.load(
            filters,
            page,
            force_refresh,
            abort,
            Presentation::Shown { realtime: false },
        )
        .await
    }

    /// Drop every memoized page.
    pub fn invalidate_all(&self) {
        let dropped = {
            let mut pages = self.pages.write();
            let n = pages.len();
            pages.clear();
            n
        };
        debug!(dropped, "Invalidated order pages");
    }

    /// Switch filters. On change the memo table is cleared and the cursor
    /// returns to page 1. Returns whether anything changed.
    pub fn set_filters(&self, filters: FilterState) -> bool {
        {
            let mut cursor = self.cursor.write();
            if cursor.filters == filters {
                return false;
            }
            cursor.filters = filters;
            cursor.page = 1;
        }
        info!(
            date_filter = %filters.date,
            type_filter = %filters.order_type,
            custom_date = ?filters.effective_custom_date(),
            "Filters changed"
        );
        self.invalidate_all();
        true
    }

    /// Move to `page` of the active filters (memo first).
    pub async fn go_to_page(&self, page: u32) -> PageOutcome {
        let page = page.max(1);
        let filters = {
            let mut cursor = self.cursor.write();
            cursor.page = page;
            cursor.filters
        };
        self.get_page(&filters, page, false).await
    }

    /// Force-refresh the active page.
    pub async fn refresh(&self) -> PageOutcome {
        let (filters, page) = self.cursor();
        self.get_page(&filters, page, true).await
    }

    /// Refetch page 1 of the active filters, overwriting its memo entry.
    ///
    /// The view follows only when the active page is 1; a dashboard parked on
    /// page 3 keeps showing page 3. Navigating away while the refresh is in
    /// flight also keeps the result off screen.
    pub async fn on_realtime_order_arrived(&self) -> PageOutcome {
        let (filters, page) = self.cursor();
        info!(active_page = page, "New order announced, refreshing page 1");
        let presentation = if page == 1 {
            Presentation::Shown { realtime: true }
        } else {
            Presentation::Hidden
        };
        self.load(&filters, 1, true, &AbortSignal::never(), presentation)
            .await
    }

    /// Replace `summary` wherever it appears: memoized pages and the view.
    pub fn apply_order_update(&self, summary: &OrderSummary) {
        let mut touched = 0usize;
        for page in self.pages.write().values_mut() {
            if page.contains(&summary.id) {
                let page = Arc::make_mut(page);
                for order in page.orders.iter_mut().filter(|o| o.id == summary.id) {
                    *order = summary.clone();
                }
                touched += 1;
            }
        }

        let current_page = {
            let mut view = self.view.write();
            for order in view.orders.iter_mut().filter(|o| o.id == summary.id) {
                *order = summary.clone();
            }
            view.page
        };
        debug!(order_id = %summary.id, pages = touched, "Applied order update");
        self.notify(current_page, false);
    }

    /// Remove a deleted order from every memoized page and the view.
    ///
    /// Every memoized page's nonzero total count drops by one. When the
    /// active page no longer exists it steps back one page; the new page is
    /// returned so the caller can load it.
    pub fn remove_order(&self, id: &OrderId) -> Option<u32> {
        for page in self.pages.write().values_mut() {
            let page = Arc::make_mut(page);
            page.orders.retain(|o| &o.id != id);
            page.order_numbers.remove(id);
            if page.total_count > 0 {
                page.total_count -= 1;
            }
        }

        let previous_total = {
            let mut view = self.view.write();
            let previous_total = view.total_count;
            view.orders.retain(|o| &o.id != id);
            view.order_numbers.remove(id);
            view.total_count = view.total_count.saturating_sub(1);
            previous_total
        };

        let step_back = {
            let mut cursor = self.cursor.write();
            let remaining_pages = pages_for(previous_total.saturating_sub(1), PAGE_SIZE);
            if cursor.page > remaining_pages && cursor.page > 1 {
                cursor.page -= 1;
                Some(cursor.page)
            } else {
                None
            }
        };

        info!(order_id = %id, step_back = ?step_back, "Removed order from listings");
        let current_page = self.view.read().page;
        self.notify(current_page, false);
        step_back
    }

    /// Active filters and page.
    #[must_use]
    pub fn cursor(&self) -> (FilterState, u32) {
        let cursor = self.cursor.read();
        (cursor.filters, cursor.page)
    }

    /// Snapshot of the displayed view.
    #[must_use]
    pub fn current(&self) -> ListView {
        self.view.read().clone()
    }

    /// Memo entry for `key`, if any.
    #[must_use]
    pub fn cached(&self, key: &CacheKey) -> Option<Arc<OrderPage>> {
        self.pages.read().get(key).cloned()
    }

    /// Memoized keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<_> = self.pages.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of memoized pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn load(
        &self,
        filters: &FilterState,
        page: u32,
        force_refresh: bool,
        abort: &AbortSignal,
        presentation: Presentation,
    ) -> PageOutcome {
        let page = page.max(1);
        let key = CacheKey::new(filters, page);
        let ticket = match presentation {
            Presentation::Shown { .. } => Some(self.view_ticket.fetch_add(1, Ordering::SeqCst) + 1),
            Presentation::Hidden => None,
        };

        if !force_refresh {
            if let Some(hit) = self.cached(&key) {
                debug!(key = %key, "Using cached page");
                self.present(ticket, presentation, page, |view| view.show(&hit));
                return PageOutcome::Cached(hit);
            }
        }

        let mut query = ListQuery::new(filters, page, PAGE_SIZE);
        if force_refresh {
            query = query.with_cache_bust(chrono::Utc::now().timestamp_millis());
        }

        self.touch_view(ticket, |view| view.loading = true);

        let result = tokio::select! {
            biased;
            () = abort.aborted() => None,
            result = self.api.list_orders(&query) => Some(result),
        };

        let Some(result) = result else {
            debug!(key = %key, "Page request cancelled");
            self.touch_view(ticket, |view| view.loading = false);
            return PageOutcome::Cancelled;
        };

        match result {
            Ok(listing) => {
                let fetched = Arc::new(self.build_page(page, listing));
                self.pages.write().insert(key.clone(), Arc::clone(&fetched));
                debug!(
                    key = %key,
                    orders = fetched.orders.len(),
                    total = fetched.total_count,
                    "Memoized page"
                );
                self.present(ticket, presentation, page, |view| view.show(&fetched));
                PageOutcome::Fetched(fetched)
            }
            Err(err) => {
                let error = ListError::from_error(&err);
                warn!(key = %key, error = %err, "Failed to fetch orders");
                self.present(ticket, presentation, page, |view| {
                    view.fail(page, error.clone());
                });
                PageOutcome::Failed(error)
            }
        }
    }

    /// Apply `change` to the view if `ticket` is still the latest claim.
    fn touch_view<F>(&self, ticket: Option<u64>, change: F) -> bool
    where
        F: FnOnce(&mut ListView),
    {
        let Some(ticket) = ticket else {
            return false;
        };
        let mut view = self.view.write();
        if self.view_ticket.load(Ordering::SeqCst) != ticket {
            return false;
        }
        change(&mut view);
        true
    }

    fn present<F>(&self, ticket: Option<u64>, presentation: Presentation, page: u32, change: F)
    where
        F: FnOnce(&mut ListView),
    {
        if self.touch_view(ticket, change) {
            let realtime = presentation == Presentation::Shown { realtime: true };
            self.notify(page, realtime);
        } else if ticket.is_some() {
            debug!(page, "Dropped stale page result");
        }
    }

    fn build_page(&self, page: u32, listing: OrderListing) -> OrderPage {
        let order_numbers =
            OrderNumberMap::for_page(&listing.orders, page, PAGE_SIZE, &self.number_prefix);
        let total_count = match listing.total_count {
            Some(count) if count > 0 => count,
            _ => listing.orders.len() as u64,
        };
        let total_pages = match listing.total_pages {
            Some(pages) if pages > 0 => pages,
            _ => pages_for(total_count, PAGE_SIZE),
        };
        OrderPage {
            page,
            orders: listing.orders,
            total_count,
            total_pages,
            order_numbers,
        }
    }

    fn notify(&self, page: u32, realtime: bool) {
        // No receivers is fine
        if let Some(ref tx) = self.tx {
            let _ = tx.send(ViewUpdate { page, realtime });
        }
    }
}
