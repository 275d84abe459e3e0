//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; `ORDERDESK_API_URL` and
//! `ORDERDESK_WS_URL` override the endpoints so one file can serve several
//! deployments.
//!
//! # Example
//!
//! ```no_run
//! use orderdesk::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::api::{ApiConfig, OrdersConfig};
use super::logging::LoggingConfig;
use super::realtime::RealtimeConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "ORDERDESK_API_URL";
/// Environment variable overriding [`RealtimeConfig::ws_url`].
pub const WS_URL_ENV: &str = "ORDERDESK_WS_URL";

/// Main application configuration.
///
/// Every section is optional; an empty file yields a config pointing at a
/// local development server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Order API endpoint and timeouts.
    #[serde(default)]
    pub api: ApiConfig,

    /// Listing presentation (order number prefix).
    #[serde(default)]
    pub orders: OrdersConfig,

    /// Realtime new-order feed.
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying environment
    /// overrides and validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |key| std::env::var(key).ok())
    }

    /// [`parse_toml`](Self::parse_toml) with an explicit variable lookup.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Defaults plus environment overrides, for running without a file.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        Self::parse_toml("")
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(url) = lookup(WS_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.realtime.ws_url = url.trim().to_string();
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        check_scheme("base_url", &self.api.base_url, &["http", "https"])?;

        if self.api.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.api.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !self.realtime.enabled {
            return Ok(());
        }

        if self.realtime.ws_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "ws_url" }.into());
        }
        check_scheme("ws_url", &self.realtime.ws_url, &["ws", "wss"])?;
        if self.realtime.event.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "event" }.into());
        }

        let reconnection = &self.realtime.reconnection;
        if reconnection.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if reconnection.max_delay_ms < reconnection.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if reconnection.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }
        if reconnection.max_consecutive_failures == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_consecutive_failures",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if reconnection.circuit_breaker_cooldown_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "circuit_breaker_cooldown_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn check_scheme(field: &'static str, raw: &str, allowed: &[&str]) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    if allowed.contains(&url.scheme()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("scheme must be one of {}", allowed.join(", ")),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::realtime::FeedProtocol;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml_with("", no_env).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.orders.number_prefix, "king-");
        assert_eq!(config.realtime.event, "newOrder");
        assert_eq!(config.realtime.protocol, FeedProtocol::SocketIo);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn sections_are_parsed() {
        let toml = r#"
            [api]
            base_url = "https://orders.example.com/api"
            timeout_ms = 2500

            [orders]
            number_prefix = "kb-"

            [realtime]
            ws_url = "wss://orders.example.com/ws"
            event = "orderPlaced"
            protocol = "json"

            [realtime.reconnection]
            initial_delay_ms = 250
            max_delay_ms = 4000

            [logging]
            level = "debug"
            format = "json"
        "#;
        let config = Config::parse_toml_with(toml, no_env).unwrap();
        assert_eq!(config.api.timeout_ms, 2500);
        assert_eq!(config.api.connect_timeout_ms, 5000);
        assert_eq!(config.orders.number_prefix, "kb-");
        assert_eq!(config.realtime.protocol, FeedProtocol::Json);
        assert_eq!(config.realtime.reconnection.initial_delay_ms, 250);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn env_overrides_endpoints() {
        let config = Config::parse_toml_with("", |key| match key {
            API_URL_ENV => Some("https://prod.example.com/api".into()),
            WS_URL_ENV => Some("wss://prod.example.com/socket.io/".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api.base_url, "https://prod.example.com/api");
        assert_eq!(config.realtime.ws_url, "wss://prod.example.com/socket.io/");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = Config::parse_toml_with("[api]\nbase_url = \"ftp://x\"", no_env).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "base_url", .. })
        ));
    }

    #[test]
    fn rejects_inverted_backoff_bounds() {
        let toml = "[realtime.reconnection]\ninitial_delay_ms = 5000\nmax_delay_ms = 100";
        let err = Config::parse_toml_with(toml, no_env).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "max_delay_ms", .. })
        ));
    }

    #[test]
    fn disabled_realtime_skips_ws_checks() {
        let toml = "[realtime]\nenabled = false\nws_url = \"\"";
        assert!(Config::parse_toml_with(toml, no_env).is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml_with("[api\nbase_url =", no_env).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
