//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`feed`] - Reconnection around the realtime feed

pub mod bootstrap;
pub mod config;
pub mod feed;
