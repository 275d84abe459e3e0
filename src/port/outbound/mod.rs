//! Outbound ports: external systems the application depends on.

pub mod order_api;
pub mod order_feed;
