//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`api`]: Scripted [`OrderApi`](crate::port::OrderApi) with call counters.
//! - [`feed`]: Mock [`OrderFeed`](crate::port::OrderFeed) implementations:
//!   `ScriptedFeed`, `ChannelFeed`.
//! - [`domain`]: Builders for orders, details and listings.

pub mod api;
pub mod domain;
pub mod feed;
