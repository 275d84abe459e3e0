//! Order API connection settings.

use serde::Deserialize;

use crate::domain::order_number::DEFAULT_ORDER_NUMBER_PREFIX;

/// HTTP settings for the order API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/orders` and `/delivery-areas` paths hang off.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout (milliseconds).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout (milliseconds).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Order listing presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    /// Prefix of the per-page display codes (`king-011`).
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,
}

fn default_number_prefix() -> String {
    DEFAULT_ORDER_NUMBER_PREFIX.into()
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
        }
    }
}
