//! Error types for reading and parsing inputs

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::sandbox::EvalError;

/// Errors surfaced to callers of the scanning pipeline.
///
/// Classification and extraction never fail; resolution failures are absorbed per loader. What
/// remains are problems with the input itself.
#[derive(Error, Debug, Diagnostic)]
pub enum SnoopError {
    /// Source text could not be parsed as JavaScript
    #[error("Failed to parse JavaScript: {message}")]
    #[diagnostic(
        code(snoop::parse),
        help("only syntactically valid JavaScript bundles can be scanned")
    )]
    Parse { message: String },

    /// Input file could not be read
    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(snoop::io))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file exceeds the size limit
    #[error("File {} is too large ({size} bytes, limit {max} bytes)", path.display())]
    #[diagnostic(code(snoop::file_too_large))]
    FileTooLarge {
        path: PathBuf,
        size: usize,
        max: usize,
    },

    /// Input file is not valid UTF-8
    #[error("File {} is not valid UTF-8", path.display())]
    #[diagnostic(code(snoop::invalid_utf8))]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A sandboxed evaluation failed outside a resolver failure boundary
    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),
}

impl SnoopError {
    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Result type for scanning operations
pub type Result<T> = std::result::Result<T, SnoopError>;
