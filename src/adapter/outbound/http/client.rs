//! HTTP client for the order API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, Response};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{decode_delivery_areas, decode_detail, decode_listing};
use crate::domain::{delivery::DeliveryArea, id::OrderId, order::OrderDetail};
use crate::error::{Error, Result};
use crate::infrastructure::config::api::ApiConfig;
use crate::port::{ListQuery, OrderApi, OrderListing};

/// [`OrderApi`] over REST.
///
/// Requests are issued once; there are no retries. Timeouts come from
/// [`ApiConfig`].
pub struct HttpOrderApi {
    http: HttpClient,
    base_url: String,
}

impl HttpOrderApi {
    /// Client with reqwest defaults (no timeouts).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: trim_base(config.base_url.clone()),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    fn order_url(&self, id: &OrderId) -> Result<Url> {
        let mut url = self.url("orders")?;
        url.path_segments_mut()
            .map_err(|()| Error::Connection(format!("base URL cannot hold a path: {}", self.base_url)))?
            .push(id.as_str());
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<Response> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        debug!(%method, url = %url, status = status.as_u16(), "Order API response");

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn send_json(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value> {
        let response = self.send(method, url, body).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn list_orders(&self, query: &ListQuery) -> Result<OrderListing> {
        let mut url = self.url("orders")?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());

        info!(
            page = query.page,
            date_filter = %query.date_filter,
            type_filter = %query.type_filter,
            forced = query.cache_bust.is_some(),
            "Fetching orders"
        );

        let body = self.send_json(Method::GET, url, None).await?;
        let listing = decode_listing(body)?;
        debug!(count = listing.orders.len(), total = ?listing.total_count, "Fetched orders");
        Ok(listing)
    }

    async fn get_order(&self, id: &OrderId) -> Result<OrderDetail> {
        let url = self.order_url(id)?;
        debug!(order_id = %id, "Fetching order detail");
        let body = self.send_json(Method::GET, url, None).await?;
        decode_detail(body)
    }

    async fn set_completed(&self, id: &OrderId, completed: bool) -> Result<OrderDetail> {
        let url = self.order_url(id)?;
        info!(order_id = %id, completed, "Updating order status");
        let body = self
            .send_json(Method::PATCH, url, Some(json!({ "isCompleted": completed })))
            .await?;
        decode_detail(body)
    }

    async fn delete_order(&self, id: &OrderId) -> Result<()> {
        let url = self.order_url(id)?;
        info!(order_id = %id, "Deleting order");
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn delivery_areas(&self) -> Result<Vec<DeliveryArea>> {
        let url = self.url("delivery-areas")?;
        let body = self.send_json(Method::GET, url, None).await?;
        let areas = decode_delivery_areas(body)?;
        debug!(count = areas.len(), "Fetched delivery areas");
        Ok(areas)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
