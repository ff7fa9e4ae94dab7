//! End-to-end analyzer runs over whole files
//!
//! This test suite covers:
//! - Suppression scoping to the annotated declaration
//! - Severity overrides, disabled rules and pass/fail gating
//! - Report order and the JSON rendering consumed by CI

use javelin_core::{DiagnosticRenderer, OutputFormat, Severity, SourceFile};
use javelin_rules::{Analyzer, LintConfig, LintContext, LintOutcome};

const ORDERS: &str = r#"package com.acme.orders;

public class Orders {

    private int count;

    void reset() {
        count = 0;
    }
    @SuppressWarnings("BEST-PRACTICE-02")
    void report() {
        int a = 1;
        int b = 2;
        int c = a + b;
        System.out.println(c);
        if (c > 2) {
            count = c;
        }
        count++;
    }

    void dump() {
        int d = count;
        count = 0;
        System.out.println(d);
    }
}
"#;

fn analyze(text: &str, ctx: &LintContext) -> Vec<javelin_core::Diagnostic> {
    Analyzer::default()
        .analyze(&SourceFile::new("Orders.java", text), ctx)
        .unwrap()
}

#[test]
fn test_suppression_covers_only_the_annotated_declaration() {
    let diagnostics = analyze(ORDERS, &LintContext::default());

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule_id, "BEST-PRACTICE-02");
    assert_eq!(diagnostics[0].line(), 25);
    assert_eq!(diagnostics[0].location.column, 9);
}

#[test]
fn test_suppression_is_per_rule() {
    let text = ORDERS.replace("BEST-PRACTICE-02", "STYLE-NAMING-02");
    let lines: Vec<usize> = analyze(&text, &LintContext::default())
        .iter()
        .map(|d| d.line())
        .collect();
    assert_eq!(lines, vec![15, 25]);
}

#[test]
fn test_suppress_all_on_type() {
    let text = "@SuppressWarnings(\"all\")\nclass orders {\n    void Run() {\n        System.out.println();\n    }\n}\n\nclass Later {\n    void Run() {}\n}\n";
    let diagnostics = analyze(text, &LintContext::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule_id, "STYLE-NAMING-02");
    assert_eq!(diagnostics[0].line(), 9);
}

#[test]
fn test_severity_override_and_gating() {
    let config = LintConfig::default().with_override("BEST-PRACTICE-02", Severity::Error);
    let ctx = LintContext::default().with_config(config);
    let diagnostics = analyze(ORDERS, &ctx);

    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(!LintOutcome::from_diagnostics(&diagnostics, false).passed());

    let diagnostics = analyze(ORDERS, &LintContext::default());
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(LintOutcome::from_diagnostics(&diagnostics, false).passed());
    assert!(!LintOutcome::from_diagnostics(&diagnostics, true).passed());
}

#[test]
fn test_disabled_rule_never_runs() {
    let config = LintConfig::default().with_disabled("BEST-PRACTICE-02");
    let ctx = LintContext::default().with_config(config);
    assert!(analyze(ORDERS, &ctx).is_empty());
}

#[test]
fn test_report_follows_registration_order() {
    let text = "import java.util.*;\n\nclass orders {\n    void f() {\n        try {\n            g();\n        } catch (Exception e) {\n        }\n    }\n}\n";
    let diagnostics = analyze(text, &LintContext::default());
    let ids: Vec<&str> = diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["STYLE-NAMING-01", "STYLE-IMPORT-01", "BEST-PRACTICE-01"]
    );

    let output = DiagnosticRenderer::with_format(OutputFormat::Json).render_diagnostics(&diagnostics);
    insta::assert_snapshot!(output, @r#"
[
  {
    "ruleId": "STYLE-NAMING-01",
    "severity": "warning",
    "file": "Orders.java",
    "line": 3,
    "column": 7,
    "message": "Type name 'orders' should be UpperCamelCase"
  },
  {
    "ruleId": "STYLE-IMPORT-01",
    "severity": "warning",
    "file": "Orders.java",
    "line": 1,
    "column": 1,
    "message": "Avoid on-demand import 'java.util.*'"
  },
  {
    "ruleId": "BEST-PRACTICE-01",
    "severity": "error",
    "file": "Orders.java",
    "line": 7,
    "column": 11,
    "message": "Empty catch block swallows the exception"
  }
]
"#);
}

#[test]
fn test_business_rules_follow_configuration() {
    let text = "package com.acme.billing.domain;\n\nimport javax.persistence.Entity;\n\npublic class Invoice {\n    public long total;\n}\n";

    assert!(analyze(text, &LintContext::default()).is_empty());

    let ctx = LintContext::default()
        .with_business_packages(["com.acme.**"])
        .unwrap();
    let diagnostics = analyze(text, &ctx);
    let ids: Vec<&str> = diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["ARCH-DOMAIN-01", "ARCH-DOMAIN-02"]);
    assert!(!LintOutcome::from_diagnostics(&diagnostics, false).passed());
}

#[test]
fn test_unparsable_file_fails() {
    let result = Analyzer::default().analyze(
        &SourceFile::new("Broken.java", "class A {\n    int x = ;\n}\n"),
        &LintContext::default(),
    );
    let err = result.unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.to_string().starts_with("Broken.java:2:"));
}
