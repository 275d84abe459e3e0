//! Lazily fetched, memoized order details.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::domain::{id::OrderId, order::OrderDetail};
use crate::port::OrderApi;

/// Detail records keyed by order id, kept for the session.
///
/// A memoized record is returned even if the order changed server-side;
/// mutations made through this session overwrite it via
/// [`invalidate`](Self::invalidate).
pub struct OrderDetailResolver {
    api: Arc<dyn OrderApi>,
    details: DashMap<OrderId, Arc<OrderDetail>>,
}

impl OrderDetailResolver {
    #[must_use]
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self {
            api,
            details: DashMap::new(),
        }
    }

    /// The detail record for `id`, fetched on first use.
    ///
    /// Failures are logged and yield `None`; nothing is memoized for them.
    pub async fn get_detail(&self, id: &OrderId) -> Option<Arc<OrderDetail>> {
        if let Some(hit) = self.peek(id) {
            debug!(order_id = %id, "Using cached order detail");
            return Some(hit);
        }

        match self.api.get_order(id).await {
            Ok(detail) => {
                let detail = Arc::new(detail);
                self.details.insert(id.clone(), Arc::clone(&detail));
                Some(detail)
            }
            Err(err) if err.is_not_found() => {
                warn!(order_id = %id, "Order not found");
                None
            }
            Err(err) => {
                warn!(order_id = %id, error = %err, "Failed to fetch order details");
                None
            }
        }
    }

    /// Overwrite the entry with `updated`, or drop it when `None`.
    pub fn invalidate(&self, id: &OrderId, updated: Option<OrderDetail>) {
        match updated {
            Some(detail) => {
                self.details.insert(id.clone(), Arc::new(detail));
            }
            None => {
                self.details.remove(id);
            }
        }
    }

    /// Memoized entry without fetching.
    #[must_use]
    pub fn peek(&self, id: &OrderId) -> Option<Arc<OrderDetail>> {
        self.details.get(id).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.details.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::api::ScriptedOrderApi;
    use crate::testkit::domain::{bare_listing, detail};

    fn resolver() -> (OrderDetailResolver, Arc<ScriptedOrderApi>) {
        let api = Arc::new(
            ScriptedOrderApi::with_listing(bare_listing(vec![])).with_details(vec![detail("a")]),
        );
        (OrderDetailResolver::new(api.clone()), api)
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_memo() {
        let (resolver, api) = resolver();
        let id = OrderId::new("a");
        let first = resolver.get_detail(&id).await.unwrap();
        let second = resolver.get_detail(&id).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.detail_calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_none_and_not_memoized() {
        let (resolver, api) = resolver();
        let id = OrderId::new("missing");
        assert!(resolver.get_detail(&id).await.is_none());
        assert!(resolver.get_detail(&id).await.is_none());
        assert_eq!(api.detail_calls(), 2);
        assert!(resolver.is_empty());
    }

    #[tokio::test]
    async fn invalidate_overwrites_or_removes() {
        let (resolver, api) = resolver();
        let id = OrderId::new("a");
        resolver.get_detail(&id).await;

        let mut updated = detail("a");
        updated.summary.is_completed = true;
        resolver.invalidate(&id, Some(updated));
        assert!(resolver.get_detail(&id).await.unwrap().summary.is_completed);
        assert_eq!(api.detail_calls(), 1);

        resolver.invalidate(&id, None);
        assert!(resolver.peek(&id).is_none());
        resolver.get_detail(&id).await;
        assert_eq!(api.detail_calls(), 2);
    }
}
