use std::path::Path;

use miette::Report;

use crate::adapter::inbound::cli::diagnostic::ConfigDiagnostic;
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::settings::Config;

/// Validate the configuration file without contacting the server.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();

    output::section("Configuration Check");
    output::field("Config", path.display());

    let config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        match Config::parse_toml(&content) {
            Ok(config) => config,
            Err(Error::Config(ConfigError::Parse(err))) => {
                if !output::is_json() {
                    let diagnostic = ConfigDiagnostic::from_toml(path.display().to_string(), content, &err)
                        .with_help("see config.example.toml for the expected layout");
                    eprintln!("{:?}", Report::new(diagnostic));
                }
                return Err(ConfigError::Parse(err).into());
            }
            Err(e) => return Err(e),
        }
    } else {
        output::warning("Config file not found; checking defaults and environment overrides");
        Config::from_env()?
    };

    output::success("Configuration is valid");

    output::section("Summary");
    output::field("API", &config.api.base_url);
    output::field("Timeout", format!("{} ms", config.api.timeout_ms));
    output::field("Order prefix", &config.orders.number_prefix);
    if config.realtime.enabled {
        output::field("Realtime", &config.realtime.ws_url);
        output::field("Event", &config.realtime.event);
        output::field("Protocol", format!("{:?}", config.realtime.protocol));
    } else {
        output::field("Realtime", "disabled");
    }
    output::field("Log level", &config.logging.level);

    Ok(())
}
