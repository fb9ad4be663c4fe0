//! Error handling for the Snoop CLI.
//!
//! Two layers, mirroring how failures surface:
//! - **`ConfigError`**: invalid configuration, reported once before any input is touched
//! - **`CliError`**: everything that can stop a run, converted to a `miette::Report` in `main`
//!
//! Per-input failures (unreadable or unparsable files) are not `CliError`s; they are printed as
//! `ERROR:` / `DUE TO:` lines and the run moves on to the next input.

use std::path::{Path, PathBuf};

use miette::{Diagnostic, Report};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The input path does not exist
    #[error("Path not found: {}", .0.display())]
    #[diagnostic(
        code(snoop::cli::not_found),
        help("Pass a JavaScript file, or a directory together with --dir")
    )]
    PathNotFound(PathBuf),

    /// Directory traversal failed
    #[error("Failed to walk {}", .path.display())]
    #[diagnostic(code(snoop::cli::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The HTTP client could not be built from the configured options
    #[error("Failed to build HTTP client")]
    #[diagnostic(code(snoop::cli::http_client))]
    HttpClient(#[source] reqwest::Error),

    /// The async runtime or a fetch task failed
    #[error("Runtime error: {0}")]
    #[diagnostic(code(snoop::cli::runtime))]
    Runtime(String),

    /// Writing a report failed
    #[error("I/O error: {0}")]
    #[diagnostic(code(snoop::cli::io))]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    #[diagnostic(code(snoop::cli::json))]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}", .0.display())]
    #[diagnostic(
        code(snoop::config::not_found),
        help("Create a snoop.config.json file or fix the --config path")
    )]
    NotFound(PathBuf),

    /// The merged configuration could not be deserialized
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(snoop::config::extract),
        help("Check snoop.config.json syntax, SNOOP_* variables and field types")
    )]
    Extract(String),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}")]
    #[diagnostic(code(snoop::config::invalid_value), help("{hint}"))]
    InvalidValue {
        /// Name of the field with the invalid value
        field: String,
        /// The invalid value
        value: String,
        /// What a valid value looks like
        hint: String,
    },
}

impl ConfigError {
    pub fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            hint: hint.into(),
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for attaching paths to traversal errors.
pub trait ResultExt<T> {
    fn with_root(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, walkdir::Error> {
    fn with_root(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| CliError::Walk {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Convert a `CliError` into a miette report for display at the top level.
pub fn cli_error_to_miette(err: CliError) -> Report {
    Report::new(err)
}

/// The message chain of an error: its own message followed by every `source()` below it.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut current = err.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::invalid("threads", "0", "Use at least one thread");
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'threads'"));
        assert!(msg.contains('0'));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let err: CliError = ConfigError::NotFound(PathBuf::from("snoop.config.json")).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("snoop.config.json"));
    }

    #[test]
    fn test_error_chain_follows_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = snoop_core::SnoopError::ReadFile {
            path: PathBuf::from("bundle.js"),
            source: io,
        };
        let chain = error_chain(&err);
        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("bundle.js"));
        assert_eq!(chain[1], "denied");
    }

    #[test]
    fn test_error_chain_single() {
        let err = CliError::Runtime("boom".into());
        assert_eq!(error_chain(&err), vec!["Runtime error: boom".to_string()]);
    }
}
