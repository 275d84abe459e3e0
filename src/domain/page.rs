//! One page of an order listing and the page-link window around it.

use serde::Serialize;

use super::id::OrderId;
use super::order::OrderSummary;
use super::order_number::OrderNumberMap;

/// Orders per listing page. Fixed; the server is always asked for this many.
pub const PAGE_SIZE: u32 = 10;

/// A memoized listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub page: u32,
    pub orders: Vec<OrderSummary>,
    pub total_count: u64,
    pub total_pages: u32,
    pub order_numbers: OrderNumberMap,
}

impl OrderPage {
    /// Display code for an order on this page.
    #[must_use]
    pub fn order_number(&self, id: &OrderId) -> Option<&str> {
        self.order_numbers.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.iter().any(|o| &o.id == id)
    }
}

/// Pages needed to show `total_count` orders.
#[must_use]
pub fn pages_for(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One entry in a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageLink {
    Page(u32),
    Gap,
}

/// Page links around `current`: first page, up to two neighbours on each
/// side, last page, with gaps where pages are skipped.
///
/// ```
/// use orderdesk::domain::page::{page_window, PageLink::{Gap, Page}};
///
/// assert_eq!(
///     page_window(6, 12),
///     vec![Page(1), Gap, Page(4), Page(5), Page(6), Page(7), Page(8), Gap, Page(12)]
/// );
/// ```
#[must_use]
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageLink> {
    const DELTA: u32 = 2;

    let mut links = Vec::new();
    let mut push = |link: PageLink| {
        // Gaps repeat; page numbers do not.
        if matches!(link, PageLink::Gap) || !links.contains(&link) {
            links.push(link);
        }
    };

    push(PageLink::Page(1));
    if current.saturating_sub(DELTA) > 2 {
        push(PageLink::Gap);
    }

    let low = current.saturating_sub(DELTA).max(2);
    let high = total_pages.saturating_sub(1).min(current + DELTA);
    for page in low..=high {
        push(PageLink::Page(page));
    }

    if current + DELTA < total_pages.saturating_sub(1) {
        push(PageLink::Gap);
        push(PageLink::Page(total_pages));
    } else if total_pages > 1 {
        push(PageLink::Page(total_pages));
    }

    links
}
