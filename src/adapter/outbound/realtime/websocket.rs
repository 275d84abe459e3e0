//! WebSocket implementation of the realtime order feed.
//!
//! # Connection Lifecycle
//!
//! 1. `connect()` opens the socket (TLS for `wss://`).
//! 2. In Socket.IO mode the server's open packet is answered with a
//!    namespace connect, and every Engine.IO ping with a pong.
//! 3. `next_event()` yields [`FeedEvent::NewOrder`] for the configured event
//!    name and skips everything else.
//! 4. Close frames, disconnect packets and socket errors surface as
//!    [`FeedEvent::Disconnected`]; the feed then reports `None` until it is
//!    connected again. Reconnecting is the caller's job.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

use super::frame::{parse_frame, Frame, CONNECT_REPLY, PONG_REPLY};
use crate::error::Result;
use crate::infrastructure::config::realtime::{FeedProtocol, RealtimeConfig};
use crate::port::{FeedEvent, OrderFeed};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Realtime order feed over a WebSocket.
pub struct WebSocketOrderFeed {
    url: String,
    event: String,
    protocol: FeedProtocol,
    ws: Option<WsStream>,
}

impl WebSocketOrderFeed {
    #[must_use]
    pub fn new(url: impl Into<String>, event: impl Into<String>, protocol: FeedProtocol) -> Self {
        Self {
            url: url.into(),
            event: event.into(),
            protocol,
            ws: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(config.ws_url.clone(), config.event.clone(), config.protocol)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    fn drop_connection(&mut self, reason: impl Into<String>) -> Option<FeedEvent> {
        self.ws = None;
        Some(FeedEvent::Disconnected {
            reason: reason.into(),
        })
    }
}

#[async_trait]
impl OrderFeed for WebSocketOrderFeed {
    async fn connect(&mut self) -> Result<()> {
        info!(url = %self.url, protocol = ?self.protocol, "Connecting to order feed");
        let (ws_stream, response) = connect_async(&self.url).await?;
        info!(status = %response.status(), "Order feed connected");
        self.ws = Some(ws_stream);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        loop {
            let ws = self.ws.as_mut()?;
            let Some(message) = ws.next().await else {
                info!("Order feed stream ended");
                return self.drop_connection("stream ended");
            };

            let text = match message {
                Ok(Message::Text(text)) => text,
                Ok(Message::Ping(data)) => {
                    trace!("Received WebSocket ping");
                    if ws.send(Message::Pong(data)).await.is_err() {
                        return self.drop_connection("failed to send pong");
                    }
                    continue;
                }
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "Order feed closed by server");
                    let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                    return self.drop_connection(reason);
                }
                Ok(_) => continue,
                Err(e) => {
                    error!(error = %e, "Order feed WebSocket error");
                    return self.drop_connection(e.to_string());
                }
            };

            trace!(bytes = text.len(), "Received order feed frame");
            let frame = match parse_frame(&text, self.protocol) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, bytes = text.len(), "Failed to parse feed frame");
                    continue;
                }
            };

            match frame {
                Frame::Open => {
                    debug!("Engine.IO open, joining namespace");
                    if ws.send(Message::Text(CONNECT_REPLY.into())).await.is_err() {
                        return self.drop_connection("failed to send namespace connect");
                    }
                }
                Frame::Ping => {
                    if ws.send(Message::Text(PONG_REPLY.into())).await.is_err() {
                        return self.drop_connection("failed to send pong");
                    }
                }
                Frame::Connected => debug!("Joined Socket.IO namespace"),
                Frame::Disconnect => {
                    info!("Order feed disconnected by server");
                    return self.drop_connection("server disconnect");
                }
                Frame::ConnectError(message) => {
                    warn!(error = %message, "Order feed refused namespace connect");
                    return self.drop_connection(message);
                }
                Frame::Event { name, data } if name == self.event => {
                    debug!(event = %name, "New order announced");
                    return Some(FeedEvent::NewOrder { payload: data });
                }
                Frame::Event { name, .. } => trace!(event = %name, "Ignoring feed event"),
                Frame::Ignored => {}
            }
        }
    }

    fn name(&self) -> &'static str {
        "websocket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_starts_disconnected() {
        let feed = WebSocketOrderFeed::from_config(&RealtimeConfig::default());
        assert!(!feed.is_connected());
        assert_eq!(feed.event, "newOrder");
        assert_eq!(feed.protocol, FeedProtocol::SocketIo);
    }

    #[tokio::test]
    async fn next_event_without_connection_is_none() {
        let mut feed = WebSocketOrderFeed::new("ws://127.0.0.1:1", "newOrder", FeedProtocol::Json);
        assert!(feed.next_event().await.is_none());
    }
}
