//! Realtime order feed port.
//!
//! The push channel that announces new orders. Consumers only care that an
//! order arrived; the payload is carried along for logging.

use async_trait::async_trait;

use crate::error::Result;

/// Events surfaced by an [`OrderFeed`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A new order was placed.
    NewOrder {
        /// Raw event payload as sent by the server.
        payload: serde_json::Value,
    },
    /// The connection dropped; the feed must be reconnected.
    Disconnected {
        /// Why the connection ended.
        reason: String,
    },
}

/// Push channel delivering new-order notifications.
#[async_trait]
pub trait OrderFeed: Send {
    /// Establish the connection, performing any handshake.
    async fn connect(&mut self) -> Result<()>;

    /// Wait for the next event. `None` means the feed is closed for good or
    /// not connected.
    async fn next_event(&mut self) -> Option<FeedEvent>;

    /// Feed name for logging.
    fn name(&self) -> &'static str;
}
