//! Orderdesk - order listing, caching and realtime refresh for a restaurant
//! admin dashboard.
//!
//! The crate is the data-access layer of an order dashboard: it pages through
//! orders under date and type filters, memoizes each page, resolves full order
//! records on demand, keeps everything current as mutations succeed, and
//! refreshes the first page whenever the server announces a new order.
//!
//! # Architecture
//!
//! - [`domain`] - Transport-agnostic types: orders, filters, pages, bills
//! - [`port`] - Traits the application depends on (`OrderApi`, `OrderFeed`)
//! - [`application`] - Query cache, detail resolver, session, realtime listener
//! - [`adapter`] - HTTP and WebSocket implementations, and the CLI
//! - [`infrastructure`] - Configuration, logging, reconnection, wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use orderdesk::domain::{DateFilter, FilterState, TypeFilter};
//! use orderdesk::infrastructure::bootstrap;
//! use orderdesk::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> orderdesk::error::Result<()> {
//! let config = Config::from_env()?;
//! let session = bootstrap::build_session(&config);
//! let filters = FilterState::new(DateFilter::Today, TypeFilter::All);
//! let outcome = session.orders().get_page(&filters, 1, false).await;
//! if let Some(page) = outcome.page() {
//!     println!("{} orders today", page.total_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
