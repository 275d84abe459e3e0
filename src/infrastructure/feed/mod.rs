//! Feed infrastructure: reconnection around any [`OrderFeed`](crate::port::OrderFeed).

pub mod reconnecting;

pub use reconnecting::ReconnectingOrderFeed;
