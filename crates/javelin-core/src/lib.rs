//! Javelin Core
//!
//! Core engine for formatting and linting Java sources.
//! This crate provides the lossless CST shared by every tool, the
//! alignment-aware formatter, the diagnostic model with its renderers,
//! and configuration loading.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, trivia on tokens)
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod result;
pub mod source;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FilesConfiguration, FormatterConfiguration, JavelinConfig, LinterConfiguration,
    RuleLevel, config_schema,
};
pub use diagnostics::{Diagnostic, DiagnosticRenderer, Location, OutputFormat, Severity};
pub use error::{ErrorKind, JavelinError};
pub use formatter::{FormatOptions, FormatResult, IndentStyle, check, format, format_text};
pub use result::Result;
pub use source::SourceFile;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with("javelin=info");
}

/// Initialize tracing with a fallback filter used when `RUST_LOG` is unset
pub fn init_tracing_with(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
