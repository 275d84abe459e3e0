//! Inbound adapters: ways users drive the application.

pub mod cli;
