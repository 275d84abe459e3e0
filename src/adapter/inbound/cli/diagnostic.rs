//! Miette-based error diagnostics for CLI error presentation.
//!
//! Rich error types with source code context, labels, and help suggestions,
//! rendered when a configuration file fails to parse.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Configuration error with source location context.
///
/// Displays the configuration file content with a labeled span pointing
/// to the problematic location, along with an optional help message.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(orderdesk::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: miette::NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Build a diagnostic from a TOML parse failure.
    #[must_use]
    pub fn from_toml(name: impl AsRef<str>, content: impl Into<String>, err: &toml::de::Error) -> Self {
        Self {
            message: err.message().to_string(),
            src: miette::NamedSource::new(name, content.into()),
            span: err.span().map(|range| SourceSpan::from(range.start..range.end)),
            help: None,
        }
    }

    /// Add a help suggestion to the error.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Network connection error.
#[derive(Debug, Error, Diagnostic)]
#[error("connection failed: {message}")]
#[diagnostic(
    code(orderdesk::connection),
    help("check that the order API is running and ORDERDESK_API_URL points at it")
)]
pub struct ConnectionDiagnostic {
    pub message: String,
}

impl ConnectionDiagnostic {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_error_carries_span() {
        let content = "[api]\nbase_url = \n";
        let err = toml::from_str::<toml::Value>(content).unwrap_err();
        let diag = ConfigDiagnostic::from_toml("config.toml", content, &err).with_help("fix it");

        assert!(diag.span.is_some());
        assert_eq!(diag.help.as_deref(), Some("fix it"));
        assert!(!diag.message.is_empty());
    }
}
