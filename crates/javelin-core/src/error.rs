//! Error types for formatting and analysis runs

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Javelin operations
#[derive(Debug, Error)]
pub enum JavelinError {
    /// No valid CST could be produced for the input
    #[error("{}:{line}:{column}: parse failed: {detail}", .file.display())]
    ParseFailed {
        file: PathBuf,
        line: usize,
        column: usize,
        detail: String,
    },

    /// File system I/O errors (only raised by file-reading/writing callers)
    #[error("IO error for path '{}': {source}", .path.display())]
    IoFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Internal printer invariant violation
    #[error("Formatter error: {detail}{}", cause_suffix(.cause))]
    FormatterError {
        detail: String,
        cause: Option<String>,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

fn cause_suffix(cause: &Option<String>) -> String {
    cause.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Io,
    Formatter,
    Config,
}

impl JavelinError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            JavelinError::ParseFailed { .. } => ErrorKind::Parse,
            JavelinError::IoFailed { .. } => ErrorKind::Io,
            JavelinError::FormatterError { .. } => ErrorKind::Formatter,
            JavelinError::ConfigError { .. } => ErrorKind::Config,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Io)
    }

    /// Create a parse failure
    pub fn parse_failed(
        file: impl Into<PathBuf>,
        line: usize,
        column: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self::ParseFailed {
            file: file.into(),
            line,
            column,
            detail: detail.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a formatter invariant error
    pub fn formatter(detail: impl Into<String>) -> Self {
        Self::FormatterError {
            detail: detail.into(),
            cause: None,
        }
    }

    /// Create a formatter invariant error with an underlying cause
    pub fn formatter_with_cause(detail: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::FormatterError {
            detail: detail.into(),
            cause: Some(cause.into()),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}
