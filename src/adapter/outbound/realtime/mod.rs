//! Realtime new-order feed over WebSocket.

pub mod frame;
pub mod websocket;

pub use websocket::WebSocketOrderFeed;
