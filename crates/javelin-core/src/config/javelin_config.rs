//! Configuration types for javelin
//!
//! A configuration file has three optional sections:
//!
//! ```toml
//! [formatter]
//! lineWidth = 100
//! indentWidth = 4
//! indentStyle = "spaces"
//! alignChains = true
//!
//! [linter]
//! failOnWarning = false
//! disabled = ["STYLE-IMPORT-01"]
//! businessPackages = ["com.acme.*.domain.**"]
//!
//! [linter.rules]
//! "BEST-PRACTICE-02" = "error"
//!
//! [files]
//! include = ["**/*.java"]
//! exclude = ["**/generated/**"]
//! ```

use crate::diagnostics::Severity;
use crate::error::JavelinError;
use crate::formatter::{FormatOptions, IndentStyle};
use crate::result::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root of a configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JavelinConfig {
    /// Formatter configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FormatterConfiguration>,

    /// Linter configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterConfiguration>,

    /// File discovery configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

/// Formatter configuration; unset fields take their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormatterConfiguration {
    #[schemars(description = "Maximum line width before wrapping (default 100)")]
    pub line_width: Option<usize>,

    #[schemars(description = "Columns per indentation level (default 4)")]
    pub indent_width: Option<usize>,

    #[schemars(description = "Indentation style: 'spaces' or 'tabs'")]
    pub indent_style: Option<IndentStyle>,

    #[schemars(description = "Break method chains one call per line, aligned on the dots")]
    pub align_chains: Option<bool>,

    #[schemars(description = "Break long argument lists one argument per line")]
    pub align_arguments: Option<bool>,

    #[schemars(description = "Break long parameter lists one parameter per line")]
    pub align_parameters: Option<bool>,

    #[schemars(description = "Group and reorder import declarations")]
    pub reorganize_imports: Option<bool>,
}

/// Per-rule level in the `rules` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    /// Disable the rule
    Off,
    Info,
    Warn,
    Error,
}

impl RuleLevel {
    /// Diagnostic severity for this level, `None` when the rule is off
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Info => Some(Severity::Info),
            RuleLevel::Warn => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

/// Linter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfiguration {
    #[schemars(description = "Severity override per rule id; 'off' disables the rule")]
    pub rules: Option<BTreeMap<String, RuleLevel>>,

    #[schemars(description = "Rule ids that never run")]
    pub disabled: Option<Vec<String>>,

    #[schemars(description = "Fail the lint run on warnings, not only on errors")]
    pub fail_on_warning: Option<bool>,

    #[schemars(
        description = "Package globs of business code ('*' is one segment, '**' any number)"
    )]
    pub business_packages: Option<Vec<String>>,

    #[schemars(description = "Maximum line length checked by STYLE-FORMAT-01 (default 120)")]
    pub max_line_length: Option<usize>,
}

/// Files configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    #[schemars(description = "Glob patterns for files to include")]
    pub include: Option<Vec<String>>,

    #[schemars(description = "Glob patterns for files to exclude")]
    pub exclude: Option<Vec<String>>,
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: Some(vec!["**/*.java".to_string()]),
            exclude: Some(vec![
                "**/target/**".to_string(),
                "**/build/**".to_string(),
                "**/out/**".to_string(),
                "**/.git/**".to_string(),
            ]),
        }
    }
}

impl JavelinConfig {
    /// Load configuration from a TOML, JSON or YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| JavelinError::io_failed(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());
        let invalid = |e: &dyn std::fmt::Display| {
            JavelinError::config_error(format!("Invalid config '{}': {e}", path.display()))
        };

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| invalid(&e))?,
            Some("json") => serde_json::from_str(&content).map_err(|e| invalid(&e))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| invalid(&e))?,
            _ => {
                return Err(JavelinError::config_error(format!(
                    "Unsupported config file '{}' (expected .toml, .json, .yaml or .yml)",
                    path.display()
                )));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the formatter and linter cannot work with
    pub fn validate(&self) -> Result<()> {
        let formatter = self.formatter_config();
        if formatter.line_width == Some(0) {
            return Err(JavelinError::config_error("formatter.lineWidth must be positive"));
        }
        if let Some(width) = formatter.indent_width
            && !(1..=16).contains(&width)
        {
            return Err(JavelinError::config_error(format!(
                "formatter.indentWidth must be between 1 and 16, got {width}"
            )));
        }
        if self.linter_config().max_line_length == Some(0) {
            return Err(JavelinError::config_error("linter.maxLineLength must be positive"));
        }
        Ok(())
    }

    /// Get formatter configuration with defaults
    pub fn formatter_config(&self) -> FormatterConfiguration {
        self.formatter.clone().unwrap_or_default()
    }

    /// Get linter configuration with defaults
    pub fn linter_config(&self) -> LinterConfiguration {
        self.linter.clone().unwrap_or_default()
    }

    /// Get files configuration with defaults
    pub fn files_config(&self) -> FilesConfiguration {
        self.files.clone().unwrap_or_default()
    }

    /// Resolved printer options
    pub fn format_options(&self) -> FormatOptions {
        self.formatter_config().to_options()
    }
}

impl FormatterConfiguration {
    pub fn to_options(&self) -> FormatOptions {
        let defaults = FormatOptions::default();
        FormatOptions {
            line_width: self.line_width.unwrap_or(defaults.line_width),
            indent_width: self.indent_width.unwrap_or(defaults.indent_width),
            indent_style: self.indent_style.unwrap_or(defaults.indent_style),
            align_chains: self.align_chains.unwrap_or(defaults.align_chains),
            align_arguments: self.align_arguments.unwrap_or(defaults.align_arguments),
            align_parameters: self.align_parameters.unwrap_or(defaults.align_parameters),
            reorganize_imports: self.reorganize_imports.unwrap_or(defaults.reorganize_imports),
        }
    }
}

/// JSON Schema of the configuration file
pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(JavelinConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| JavelinError::config_error(format!("Failed to serialize schema: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_level_serialization() {
        let json = serde_json::to_string(&RuleLevel::Warn).unwrap();
        assert_eq!(json, r#""warn""#);
        assert_eq!(RuleLevel::Off.severity(), None);
        assert_eq!(RuleLevel::Error.severity(), Some(Severity::Error));
    }

    #[test]
    fn test_toml_sections() {
        let config: JavelinConfig = toml::from_str(
            r#"
            [formatter]
            lineWidth = 80
            indentStyle = "tabs"
            alignChains = false

            [linter]
            failOnWarning = true
            businessPackages = ["com.acme.**"]

            [linter.rules]
            "BEST-PRACTICE-02" = "error"
            "STYLE-IMPORT-01" = "off"
            "#,
        )
        .unwrap();

        let options = config.format_options();
        assert_eq!(options.line_width, 80);
        assert_eq!(options.indent_width, 4);
        assert_eq!(options.indent_style, IndentStyle::Tabs);
        assert!(!options.align_chains);
        assert!(options.reorganize_imports);

        let linter = config.linter_config();
        assert_eq!(linter.fail_on_warning, Some(true));
        let rules = linter.rules.unwrap();
        assert_eq!(rules["BEST-PRACTICE-02"], RuleLevel::Error);
        assert_eq!(rules["STYLE-IMPORT-01"], RuleLevel::Off);
    }

    #[test]
    fn test_defaults() {
        let config = JavelinConfig::default();
        assert_eq!(config.format_options(), FormatOptions::default());
        assert_eq!(
            config.files_config().include,
            Some(vec!["**/*.java".to_string()])
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = JavelinConfig {
            formatter: Some(FormatterConfiguration {
                indent_width: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("indentWidth"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result: std::result::Result<JavelinConfig, _> =
            serde_json::from_str(r#"{"formater": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_names_sections() {
        let schema = config_schema().unwrap();
        assert!(schema.contains("\"formatter\""));
        assert!(schema.contains("\"lineWidth\""));
        assert!(schema.contains("\"businessPackages\""));
    }
}
