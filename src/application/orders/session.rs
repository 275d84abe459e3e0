//! Session-scoped owner of the order caches.
//!
//! One [`OrderSession`] lives from dashboard start to dashboard exit. It
//! holds the API handle, both memo tables and the delivery-area table, and
//! keeps them consistent when the operator changes an order.

use std::sync::Arc;

use tokio::sync::{broadcast, OnceCell};
use tracing::{info, warn};

use super::detail::OrderDetailResolver;
use super::query_cache::{OrderQueryCache, ViewUpdate};
use crate::domain::{
    bill::{delivery_fee, Bill, KitchenTicket},
    delivery::DeliveryAreas,
    id::OrderId,
    order::OrderDetail,
};
use crate::error::Result;
use crate::port::OrderApi;

/// Capacity of the view-update broadcast channel.
const VIEW_UPDATE_CAPACITY: usize = 64;

pub struct OrderSession {
    api: Arc<dyn OrderApi>,
    orders: OrderQueryCache,
    details: OrderDetailResolver,
    areas: OnceCell<DeliveryAreas>,
}

impl OrderSession {
    #[must_use]
    pub fn new(api: Arc<dyn OrderApi>, number_prefix: impl Into<String>) -> Self {
        Self {
            orders: OrderQueryCache::new(Arc::clone(&api), number_prefix),
            details: OrderDetailResolver::new(Arc::clone(&api)),
            areas: OnceCell::new(),
            api,
        }
    }

    /// Session whose listing cache broadcasts [`ViewUpdate`]s.
    #[must_use]
    pub fn with_notifications(
        api: Arc<dyn OrderApi>,
        number_prefix: impl Into<String>,
    ) -> (Self, broadcast::Receiver<ViewUpdate>) {
        let (orders, rx) =
            OrderQueryCache::with_notifications(Arc::clone(&api), number_prefix, VIEW_UPDATE_CAPACITY);
        let session = Self {
            orders,
            details: OrderDetailResolver::new(Arc::clone(&api)),
            areas: OnceCell::new(),
            api,
        };
        (session, rx)
    }

    #[must_use]
    pub fn orders(&self) -> &OrderQueryCache {
        &self.orders
    }

    #[must_use]
    pub fn details(&self) -> &OrderDetailResolver {
        &self.details
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.api.endpoint()
    }

    /// Flip the completion flag of `id`, given its current value.
    ///
    /// On success the server's record replaces the memoized detail and the
    /// summary is propagated into every memoized page.
    pub async fn toggle_completion(&self, id: &OrderId, current: bool) -> Result<Arc<OrderDetail>> {
        let updated = self.api.set_completed(id, !current).await.map_err(|err| {
            warn!(order_id = %id, error = %err, "Failed to update order completion");
            err
        })?;

        info!(order_id = %id, completed = updated.summary.is_completed, "Order status updated");
        self.orders.apply_order_update(&updated.summary);
        self.details.invalidate(id, Some(updated.clone()));
        Ok(Arc::new(updated))
    }

    /// Delete `id` and drop it from both caches.
    ///
    /// When the active page disappears the previous page is loaded.
    pub async fn delete_order(&self, id: &OrderId) -> Result<()> {
        self.api.delete_order(id).await.map_err(|err| {
            warn!(order_id = %id, error = %err, "Failed to delete order");
            err
        })?;

        self.details.invalidate(id, None);
        if let Some(page) = self.orders.remove_order(id) {
            self.orders.go_to_page(page).await;
        }
        Ok(())
    }

    /// Delivery-area fee table, fetched on first use.
    ///
    /// A failed fetch yields an empty table for the rest of the session.
    pub async fn delivery_areas(&self) -> &DeliveryAreas {
        self.areas
            .get_or_init(|| async {
                match self.api.delivery_areas().await {
                    Ok(areas) => {
                        info!(count = areas.len(), "Loaded delivery areas");
                        DeliveryAreas::new(areas)
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to load delivery areas");
                        DeliveryAreas::default()
                    }
                }
            })
            .await
    }

    /// Display code of `id` on whichever page it was listed.
    #[must_use]
    pub fn order_number(&self, id: &OrderId) -> Option<String> {
        if let Some(number) = self.orders.current().order_number(id) {
            return Some(number.to_string());
        }
        self.orders.keys().iter().find_map(|key| {
            self.orders
                .cached(key)
                .and_then(|page| page.order_number(id).map(str::to_string))
        })
    }

    /// Bill for `id` including its delivery charge. `None` when the detail
    /// cannot be fetched.
    pub async fn bill(&self, id: &OrderId) -> Option<Bill> {
        let detail = self.details.get_detail(id).await?;
        let fee = delivery_fee(&detail, self.delivery_areas().await);
        Some(Bill::from_order(&detail, fee, self.order_number(id).as_deref()))
    }

    pub async fn kitchen_ticket(&self, id: &OrderId) -> Option<KitchenTicket> {
        let detail = self.details.get_detail(id).await?;
        Some(KitchenTicket::from_order(&detail, self.order_number(id).as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::delivery::DeliveryArea;
    use crate::domain::filter::{CacheKey, FilterState};
    use crate::testkit::api::ScriptedOrderApi;
    use crate::testkit::domain::{detail, listing, summaries};
    use rust_decimal_macros::dec;

    fn session(api: ScriptedOrderApi) -> (OrderSession, Arc<ScriptedOrderApi>) {
        let api = Arc::new(api);
        (OrderSession::new(api.clone(), "king-"), api)
    }

    fn scripted() -> ScriptedOrderApi {
        ScriptedOrderApi::with_listing(listing(summaries("o", 3), 3, 1))
            .with_details(vec![detail("o0"), detail("o1"), detail("o2")])
            .with_areas(vec![DeliveryArea {
                name: "Landhi".into(),
                fee: dec!(150),
            }])
    }

    #[tokio::test]
    async fn toggle_updates_both_caches() {
        let (session, _) = session(scripted());
        session.orders().go_to_page(1).await;
        let id = OrderId::new("o1");

        let updated = session.toggle_completion(&id, false).await.unwrap();
        assert!(updated.summary.is_completed);
        assert!(session.details().peek(&id).unwrap().summary.is_completed);
        assert!(session.orders().current().orders[1].is_completed);
        let key = CacheKey::new(&FilterState::default(), 1);
        assert!(session.orders().cached(&key).unwrap().orders[1].is_completed);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_caches_alone() {
        let (session, api) = session(scripted().with_failing_mutations());
        session.orders().go_to_page(1).await;
        let id = OrderId::new("o1");
        session.details().get_detail(&id).await;

        assert!(session.toggle_completion(&id, false).await.is_err());
        assert!(session.delete_order(&id).await.is_err());
        assert_eq!(api.mutation_calls(), 2);
        assert!(!session.details().peek(&id).unwrap().summary.is_completed);
        assert_eq!(session.orders().current().orders.len(), 3);
    }

    #[tokio::test]
    async fn delete_drops_order_everywhere() {
        let (session, _) = session(scripted());
        session.orders().go_to_page(1).await;
        let id = OrderId::new("o2");
        session.details().get_detail(&id).await;

        session.delete_order(&id).await.unwrap();
        assert!(session.details().peek(&id).is_none());
        let view = session.orders().current();
        assert_eq!(view.orders.len(), 2);
        assert_eq!(view.total_count, 2);
    }

    #[tokio::test]
    async fn delivery_areas_are_fetched_once() {
        let (session, api) = session(scripted());
        assert_eq!(session.delivery_areas().await.len(), 1);
        assert_eq!(session.delivery_areas().await.len(), 1);
        assert_eq!(api.area_calls(), 1);
    }

    #[tokio::test]
    async fn bill_uses_area_from_address_and_order_number() {
        let (session, _) = session(scripted());
        session.orders().go_to_page(1).await;
        let bill = session.bill(&OrderId::new("o1")).await.unwrap();
        assert_eq!(bill.order_number.as_deref(), Some("king-002"));
        assert_eq!(bill.delivery_charges, dec!(150));
        assert_eq!(bill.lines[0].quantity, 2);
        assert_eq!(bill.lines[0].amount, dec!(900));
    }

    #[tokio::test]
    async fn kitchen_ticket_without_listing_has_no_number() {
        let (session, _) = session(scripted());
        let ticket = session.kitchen_ticket(&OrderId::new("o0")).await.unwrap();
        assert_eq!(ticket.order_number, None);
        assert_eq!(ticket.lines[0], ("Zinger Burger".to_string(), 2));
    }
}
