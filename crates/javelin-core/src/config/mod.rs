//! Configuration system for javelin
//!
//! - TOML, JSON and YAML configuration files with the same schema
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is provided, the tools search for one of
//! `javelin.toml`, `.javelin.toml`, `javelin.json`, `javelin.yaml` or
//! `javelin.yml` starting from the current directory and moving up the
//! directory tree. Without a file every setting takes its default.

mod javelin_config;
mod loader;

pub use javelin_config::{
    FilesConfiguration, FormatterConfiguration, JavelinConfig, LinterConfiguration, RuleLevel,
    config_schema,
};
pub use loader::ConfigLoader;
