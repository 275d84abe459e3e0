//! Scripted [`OrderApi`] for cache and session tests.
//!
//! Listing responses are produced by a closure so each test can shape them
//! per query (page, filters, cache-bust). Every call is counted and every
//! listing query recorded for later assertions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{delivery::DeliveryArea, id::OrderId, order::OrderDetail};
use crate::error::{Error, Result};
use crate::port::{ListQuery, OrderApi, OrderListing};

type ListHandler = Box<dyn Fn(&ListQuery) -> Result<OrderListing> + Send + Sync>;

/// In-memory order API.
pub struct ScriptedOrderApi {
    list_handler: ListHandler,
    list_delay: Option<Duration>,
    details: Mutex<HashMap<OrderId, OrderDetail>>,
    areas: Vec<DeliveryArea>,
    fail_mutations: bool,
    queries: Mutex<Vec<ListQuery>>,
    list_calls: AtomicU32,
    detail_calls: AtomicU32,
    mutation_calls: AtomicU32,
    area_calls: AtomicU32,
}

impl ScriptedOrderApi {
    /// Listings come from `handler`; detail, mutation and area calls use the
    /// in-memory tables.
    pub fn new<H>(handler: H) -> Self
    where
        H: Fn(&ListQuery) -> Result<OrderListing> + Send + Sync + 'static,
    {
        Self {
            list_handler: Box::new(handler),
            list_delay: None,
            details: Mutex::new(HashMap::new()),
            areas: Vec::new(),
            fail_mutations: false,
            queries: Mutex::new(Vec::new()),
            list_calls: AtomicU32::new(0),
            detail_calls: AtomicU32::new(0),
            mutation_calls: AtomicU32::new(0),
            area_calls: AtomicU32::new(0),
        }
    }

    /// Every listing returns the same orders.
    pub fn with_listing(listing: OrderListing) -> Self {
        Self::new(move |_| Ok(listing.clone()))
    }

    /// Listing calls sleep this long before answering.
    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn with_details(self, details: Vec<OrderDetail>) -> Self {
        {
            let mut table = self.details.lock();
            for detail in details {
                table.insert(detail.id().clone(), detail);
            }
        }
        self
    }

    pub fn with_areas(mut self, areas: Vec<DeliveryArea>) -> Self {
        self.areas = areas;
        self
    }

    /// PATCH and DELETE answer with a 500.
    pub fn with_failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> u32 {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> u32 {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn area_calls(&self) -> u32 {
        self.area_calls.load(Ordering::SeqCst)
    }

    /// Listing queries in call order.
    pub fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().clone()
    }

    fn not_found(id: &OrderId) -> Error {
        Error::Status {
            status: 404,
            url: format!("scripted://orders/{id}"),
        }
    }

    fn server_error(id: &OrderId) -> Error {
        Error::Status {
            status: 500,
            url: format!("scripted://orders/{id}"),
        }
    }
}

#[async_trait]
impl OrderApi for ScriptedOrderApi {
    async fn list_orders(&self, query: &ListQuery) -> Result<OrderListing> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        (self.list_handler)(query)
    }

    async fn get_order(&self, id: &OrderId) -> Result<OrderDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn set_completed(&self, id: &OrderId, completed: bool) -> Result<OrderDetail> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(Self::server_error(id));
        }
        let mut details = self.details.lock();
        let detail = details.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        detail.summary.is_completed = completed;
        Ok(detail.clone())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(Self::server_error(id));
        }
        self.details
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }

    async fn delivery_areas(&self) -> Result<Vec<DeliveryArea>> {
        self.area_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.areas.clone())
    }

    fn endpoint(&self) -> &str {
        "scripted://"
    }
}
