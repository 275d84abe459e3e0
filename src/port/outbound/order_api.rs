//! Order API port.
//!
//! The remote order service: paginated listings, detail records, the two
//! mutations the dashboard performs, and the delivery-area table.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    delivery::DeliveryArea, filter::DateFilter, filter::FilterState, filter::TypeFilter,
    id::OrderId, order::OrderDetail, order::OrderSummary,
};
use crate::error::Result;

/// Query parameters for one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub date_filter: DateFilter,
    pub type_filter: TypeFilter,
    /// Sent only for custom date listings.
    pub custom_date: Option<NaiveDate>,
    /// Cache-busting timestamp (unix millis), set on forced refreshes.
    pub cache_bust: Option<i64>,
}

impl ListQuery {
    #[must_use]
    pub fn new(filters: &FilterState, page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            date_filter: filters.date,
            type_filter: filters.order_type,
            custom_date: filters.effective_custom_date(),
            cache_bust: None,
        }
    }

    #[must_use]
    pub fn with_cache_bust(mut self, timestamp_ms: i64) -> Self {
        self.cache_bust = Some(timestamp_ms);
        self
    }

    /// Query-string pairs in the order the server documents them.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("dateFilter", self.date_filter.to_string()),
            ("typeFilter", self.type_filter.to_string()),
        ];
        if let Some(day) = self.custom_date {
            pairs.push(("customDate", day.format("%Y-%m-%d").to_string()));
        }
        if let Some(ts) = self.cache_bust {
            pairs.push(("_t", ts.to_string()));
        }
        pairs
    }
}

/// A decoded listing response.
///
/// Totals are optional because the server may omit them; callers apply
/// their own fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListing {
    pub orders: Vec<OrderSummary>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u32>,
    pub current_page: Option<u32>,
}

/// Remote order service.
///
/// Implementations must report a body without an `orders` array as
/// [`Error::MalformedResponse`](crate::error::Error::MalformedResponse) so
/// callers can tell it apart from transport failures.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// `GET /orders` with listing parameters.
    async fn list_orders(&self, query: &ListQuery) -> Result<OrderListing>;

    /// `GET /orders/{id}`.
    async fn get_order(&self, id: &OrderId) -> Result<OrderDetail>;

    /// `PATCH /orders/{id}` with `{"isCompleted": completed}`.
    async fn set_completed(&self, id: &OrderId, completed: bool) -> Result<OrderDetail>;

    /// `DELETE /orders/{id}`.
    async fn delete_order(&self, id: &OrderId) -> Result<()>;

    /// `GET /delivery-areas`.
    async fn delivery_areas(&self) -> Result<Vec<DeliveryArea>>;

    /// Base endpoint, for logging.
    fn endpoint(&self) -> &str;
}
