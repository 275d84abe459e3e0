//! Configuration and connection validation command handlers.

pub mod config;
pub mod connection;
