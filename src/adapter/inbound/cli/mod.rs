//! Command-line front end.
//!
//! [`run`] dispatches a parsed [`command::Cli`] to its handler. Handlers
//! print through [`output`], which honors `--json` and `--quiet`.

pub mod check;
pub mod command;
pub mod diagnostic;
pub mod orders;
pub mod output;
pub mod paths;
pub mod watch;

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use command::{CheckCommand, Cli, Commands};

/// Load `path`, or defaults plus environment overrides when it is absent.
#[allow(clippy::result_large_err)]
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        debug!(path = %path.display(), "Config file not found, using defaults");
        Config::from_env()
    }
}

/// Log filter implied by `-q`/`-v`, overriding the configured level.
#[must_use]
pub fn log_level_override(quiet: bool, verbose: u8) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    }
}

/// Execute the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    if let Commands::Check(CheckCommand::Config) = cli.command {
        return check::config::execute_config(&cli.config);
    }

    let config = load_config(&cli.config)?;
    match log_level_override(cli.quiet, cli.verbose) {
        Some(level) => config.logging.init_with_level(level),
        None => config.init_logging(),
    }

    match cli.command {
        Commands::List(args) => {
            let session = bootstrap::build_session(&config);
            orders::execute_list(&session, &args.filters, args.page).await
        }
        Commands::Show(args) => orders::execute_show(&bootstrap::build_session(&config), &args.id).await,
        Commands::Toggle(args) => {
            orders::execute_toggle(&bootstrap::build_session(&config), &args.id).await
        }
        Commands::Delete(args) => {
            orders::execute_delete(&bootstrap::build_session(&config), &args.id, args.yes).await
        }
        Commands::Bill(args) => {
            orders::execute_bill(&bootstrap::build_session(&config), &args.id, args.kitchen).await
        }
        Commands::Watch(args) => watch::execute(&config, &args.filters).await,
        Commands::Check(CheckCommand::Connection) => check::connection::execute_connection(&config).await,
        Commands::Check(CheckCommand::Config) => check::config::execute_config(&cli.config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_log_level() {
        assert_eq!(log_level_override(false, 0), None);
        assert_eq!(log_level_override(false, 1), Some("debug"));
        assert_eq!(log_level_override(false, 3), Some("trace"));
        assert_eq!(log_level_override(true, 2), Some("error"));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(config.api.base_url.starts_with("http"));
    }
}
