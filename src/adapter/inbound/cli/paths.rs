//! Path utilities for orderdesk.
//!
//! Local state lives under `~/.orderdesk/`:
//! - `~/.orderdesk/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the orderdesk home directory (`~/.orderdesk/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".orderdesk")
}

/// Returns the default config file path (`~/.orderdesk/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_orderdesk_home() {
        let config = default_config();
        assert!(config.starts_with(home_dir()));
        assert!(config.to_string_lossy().contains(".orderdesk"));
        assert_eq!(config.file_name().and_then(|n| n.to_str()), Some("config.toml"));
    }
}
