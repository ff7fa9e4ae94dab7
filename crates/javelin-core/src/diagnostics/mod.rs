//! Diagnostics produced by the rule analyzer
//!
//! - [`Diagnostic`]: one immutable finding with its location
//! - [`DiagnosticRenderer`]: human, JSON and SARIF renderings

mod renderer;
mod types;

pub use renderer::{DiagnosticRenderer, OutputFormat};
pub use types::{Diagnostic, Location, Severity};
