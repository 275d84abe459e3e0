//! Application services: caches and the realtime listener, written against
//! the ports only.

pub mod abort;
pub mod orders;

pub use abort::{AbortHandle, AbortSignal};
pub use orders::{OrderDetailResolver, OrderQueryCache, OrderSession, RealtimeListener};
