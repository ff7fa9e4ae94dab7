//! Diagnostic renderings for terminals and CI consumers

use super::{Diagnostic, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `file:line:col: SEVERITY [rule-id] message` blocks
    #[default]
    Human,
    /// Flat JSON array
    Json,
    /// SARIF 2.1.0 report
    Sarif,
}

/// Flat record of the JSON rendering
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDiagnostic<'a> {
    rule_id: &'a str,
    severity: Severity,
    file: String,
    line: usize,
    column: usize,
    message: &'a str,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        Self {
            rule_id: &diagnostic.rule_id,
            severity: diagnostic.severity,
            file: diagnostic.location.file.display().to_string(),
            line: diagnostic.location.line,
            column: diagnostic.location.column,
            message: &diagnostic.message,
        }
    }
}

/// Renders diagnostic lists in one output format
#[derive(Debug, Clone, Default)]
pub struct DiagnosticRenderer {
    output_format: OutputFormat,
}

impl DiagnosticRenderer {
    /// Create a renderer with human-readable output
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with specific output format
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            output_format: format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.output_format
    }

    /// Render all diagnostics with the configured output format
    pub fn render_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        match self.output_format {
            OutputFormat::Human => diagnostics
                .iter()
                .map(|d| self.render_human(d))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => self.render_json(diagnostics),
            OutputFormat::Sarif => self.render_sarif(diagnostics),
        }
    }

    /// One human-readable block; extra lines only when present
    pub fn render_human(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format!(
            "{}: {} [{}] {}",
            diagnostic.location,
            diagnostic.severity.to_string().to_uppercase(),
            diagnostic.rule_id,
            diagnostic.message
        );
        let extras = [
            ("details", &diagnostic.details),
            ("example", &diagnostic.example),
            ("docs", &diagnostic.docs_url),
        ];
        for (label, value) in extras {
            if let Some(value) = value {
                output.push_str(&format!("\n  {label}: {value}"));
            }
        }
        output
    }

    fn render_json(&self, diagnostics: &[Diagnostic]) -> String {
        let records: Vec<JsonDiagnostic> = diagnostics.iter().map(JsonDiagnostic::from).collect();
        serde_json::to_string_pretty(&records)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn render_sarif(&self, diagnostics: &[Diagnostic]) -> String {
        // One driver rule per distinct id, sorted for stable output
        let mut rules = BTreeMap::new();
        for diagnostic in diagnostics {
            rules
                .entry(diagnostic.rule_id.as_str())
                .or_insert(diagnostic.docs_url.as_deref());
        }
        let rules: Vec<serde_json::Value> = rules
            .into_iter()
            .map(|(id, docs)| match docs {
                Some(uri) => serde_json::json!({ "id": id, "helpUri": uri }),
                None => serde_json::json!({ "id": id }),
            })
            .collect();

        let results: Vec<serde_json::Value> =
            diagnostics.iter().map(diagnostic_to_sarif).collect();

        let sarif = serde_json::json!({
            "version": "2.1.0",
            "$schema": SARIF_SCHEMA,
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "javelin",
                        "version": crate::VERSION,
                        "rules": rules
                    }
                },
                "results": results
            }]
        });
        serde_json::to_string_pretty(&sarif)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize SARIF: {e}\"}}"))
    }
}

fn diagnostic_to_sarif(diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "ruleId": diagnostic.rule_id,
        "level": diagnostic.severity.sarif_level(),
        "message": {
            "text": diagnostic.message
        },
        "locations": [{
            "physicalLocation": {
                "artifactLocation": {
                    "uri": diagnostic.location.file.display().to_string()
                },
                "region": {
                    "startLine": diagnostic.location.line,
                    "startColumn": diagnostic.location.column
                }
            }
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Location;

    fn sample() -> Vec<Diagnostic> {
        vec![
            Diagnostic::new(
                "BEST-PRACTICE-01",
                Severity::Error,
                "Empty catch block swallows the exception",
                Location::new("src/Order.java", 12, 9),
            )
            .with_details("Handle or rethrow the exception")
            .with_docs_url("https://javelin.dev/rules/BEST-PRACTICE-01"),
            Diagnostic::new(
                "STYLE-IMPORT-01",
                Severity::Info,
                "Avoid on-demand import 'java.util.*'",
                Location::new("src/Order.java", 3, 1),
            ),
        ]
    }

    #[test]
    fn test_human_output() {
        let output = DiagnosticRenderer::new().render_diagnostics(&sample());
        insta::assert_snapshot!(output, @r"
src/Order.java:12:9: ERROR [BEST-PRACTICE-01] Empty catch block swallows the exception
  details: Handle or rethrow the exception
  docs: https://javelin.dev/rules/BEST-PRACTICE-01
src/Order.java:3:1: INFO [STYLE-IMPORT-01] Avoid on-demand import 'java.util.*'
");
    }

    #[test]
    fn test_json_output() {
        let output = DiagnosticRenderer::with_format(OutputFormat::Json)
            .render_diagnostics(&sample()[1..]);
        insta::assert_snapshot!(output, @r#"
[
  {
    "ruleId": "STYLE-IMPORT-01",
    "severity": "info",
    "file": "src/Order.java",
    "line": 3,
    "column": 1,
    "message": "Avoid on-demand import 'java.util.*'"
  }
]
"#);
    }

    #[test]
    fn test_empty_json_is_an_array() {
        let output = DiagnosticRenderer::with_format(OutputFormat::Json).render_diagnostics(&[]);
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_sarif_shape() {
        let output =
            DiagnosticRenderer::with_format(OutputFormat::Sarif).render_diagnostics(&sample());
        let sarif: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(sarif["version"], "2.1.0");
        let run = &sarif["runs"][0];
        assert_eq!(run["tool"]["driver"]["name"], "javelin");
        assert_eq!(run["tool"]["driver"]["rules"][0]["id"], "BEST-PRACTICE-01");
        assert_eq!(
            run["tool"]["driver"]["rules"][0]["helpUri"],
            "https://javelin.dev/rules/BEST-PRACTICE-01"
        );

        let first = &run["results"][0];
        assert_eq!(first["ruleId"], "BEST-PRACTICE-01");
        assert_eq!(first["level"], "error");
        assert_eq!(first["message"]["text"], "Empty catch block swallows the exception");
        let location = &first["locations"][0]["physicalLocation"];
        assert_eq!(location["artifactLocation"]["uri"], "src/Order.java");
        assert_eq!(location["region"]["startLine"], 12);
        assert_eq!(location["region"]["startColumn"], 9);

        assert_eq!(run["results"][1]["level"], "note");
    }
}
