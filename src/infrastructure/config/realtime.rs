//! Realtime feed and reconnection configuration.

use serde::Deserialize;

/// Wire framing spoken by the realtime server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedProtocol {
    /// Engine.IO v4 / Socket.IO text frames.
    #[default]
    SocketIo,
    /// Bare JSON objects carrying an event name and payload.
    Json,
}

/// Realtime new-order feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Event name announcing a new order.
    #[serde(default = "default_event")]
    pub event: String,
    #[serde(default)]
    pub protocol: FeedProtocol,
    #[serde(default)]
    pub reconnection: ReconnectionConfig,
}

const fn default_enabled() -> bool {
    true
}

fn default_ws_url() -> String {
    "ws://localhost:3000/socket.io/?EIO=4&transport=websocket".into()
}

fn default_event() -> String {
    "newOrder".into()
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ws_url: default_ws_url(),
            event: default_event(),
            protocol: FeedProtocol::default(),
            reconnection: ReconnectionConfig::default(),
        }
    }
}

/// WebSocket reconnection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectionConfig {
    /// Initial delay before first reconnection attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to delay after each failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Maximum consecutive failures before the circuit breaker trips.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
    /// Cooldown period after the circuit breaker trips (milliseconds).
    #[serde(default = "default_circuit_breaker_cooldown_ms")]
    pub circuit_breaker_cooldown_ms: u64,
}

fn default_initial_delay_ms() -> u64 {
    1000 // 1 second
}

fn default_max_delay_ms() -> u64 {
    30000 // 30 seconds
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_consecutive_failures() -> u32 {
    10
}

fn default_circuit_breaker_cooldown_ms() -> u64 {
    120000 // 2 minutes
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_consecutive_failures: default_max_consecutive_failures(),
            circuit_breaker_cooldown_ms: default_circuit_breaker_cooldown_ms(),
        }
    }
}
