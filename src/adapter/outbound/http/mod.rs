//! REST adapter for the order API.

pub mod client;
pub mod dto;

pub use client::HttpOrderApi;
