//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!        ┌────────────────────────┐
//!        │      Application       │
//!        │  query cache, details, │
//!        │  session, listener     │
//!        └───────────┬────────────┘
//!           ┌────────┴─────────┐
//!           ▼                  ▼
//!     ┌───────────┐      ┌─────────────┐
//!     │ OrderApi  │      │  OrderFeed  │
//!     │  (HTTP)   │      │ (WebSocket) │
//!     └───────────┘      └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`OrderApi`] - listing, detail, mutations, delivery areas
//! - [`OrderFeed`] - realtime new-order notifications

pub mod outbound;

pub use outbound::order_api::{ListQuery, OrderApi, OrderListing};
pub use outbound::order_feed::{FeedEvent, OrderFeed};
