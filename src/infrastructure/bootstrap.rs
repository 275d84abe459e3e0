//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::adapter::outbound::http::HttpOrderApi;
use crate::adapter::outbound::realtime::WebSocketOrderFeed;
use crate::application::orders::{ListenerStats, OrderSession, RealtimeListener, ViewUpdate};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::feed::ReconnectingOrderFeed;
use crate::port::OrderApi;

/// HTTP order API from configuration.
#[must_use]
pub fn build_order_api(config: &Config) -> Arc<dyn OrderApi> {
    info!(endpoint = %config.api.base_url, "Order API configured");
    Arc::new(HttpOrderApi::from_config(&config.api))
}

/// A fresh session against the configured API.
#[must_use]
pub fn build_session(config: &Config) -> OrderSession {
    OrderSession::new(build_order_api(config), config.orders.number_prefix.clone())
}

/// A session that broadcasts view updates, for live displays.
#[must_use]
pub fn build_watched_session(config: &Config) -> (OrderSession, broadcast::Receiver<ViewUpdate>) {
    OrderSession::with_notifications(build_order_api(config), config.orders.number_prefix.clone())
}

/// Reconnecting WebSocket feed from configuration.
#[must_use]
pub fn build_feed(config: &Config) -> ReconnectingOrderFeed<WebSocketOrderFeed> {
    ReconnectingOrderFeed::new(
        WebSocketOrderFeed::from_config(&config.realtime),
        config.realtime.reconnection.clone(),
    )
}

/// Start the realtime listener when the feed is enabled.
pub fn spawn_listener(
    config: &Config,
    session: Arc<OrderSession>,
    shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<ListenerStats>> {
    if !config.realtime.enabled {
        info!("Realtime feed disabled");
        return None;
    }
    Some(RealtimeListener::new(build_feed(config), session).spawn(shutdown))
}
