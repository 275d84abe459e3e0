//! Order listing, detail and realtime services.

pub mod detail;
pub mod listener;
pub mod query_cache;
pub mod session;

pub use detail::OrderDetailResolver;
pub use listener::{ListenerStats, RealtimeListener};
pub use query_cache::{ListError, ListErrorKind, ListView, OrderQueryCache, PageOutcome, ViewUpdate};
pub use session::OrderSession;
