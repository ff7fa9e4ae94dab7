//! Layering rules for business packages
//!
//! Both rules only look at files whose `package` matches one of the
//! configured business package globs.

use super::imports::{imported_name, imports};
use super::naming::{has_modifier, type_name};
use super::package_name;
use crate::context::LintContext;
use crate::engine::{Rule, RuleCategory, RuleMetadata};
use javelin_core::cst::{CstNode, Node, NodeKind};
use javelin_core::{Diagnostic, Severity, SourceFile};

/// Rule ID for public mutable fields in business types
pub const PUBLIC_MUTABLE_FIELD: &str = "ARCH-DOMAIN-01";

/// Rule ID for infrastructure imports in business code
pub const INFRASTRUCTURE_IMPORT: &str = "ARCH-DOMAIN-02";

/// Packages business code must not depend on
pub const INFRASTRUCTURE_PACKAGES: &[&str] = &[
    "java.sql",
    "javax.servlet",
    "jakarta.servlet",
    "javax.persistence",
    "jakarta.persistence",
];

fn in_business_package(root: &CstNode, ctx: &LintContext) -> bool {
    package_name(root).is_some_and(|package| ctx.is_business_package(&package))
}

/// Business types exposing public fields that are not final
///
/// Interface and annotation fields are implicitly final and never reported.
pub struct PublicMutableField;

static PUBLIC_MUTABLE_FIELD_METADATA: RuleMetadata = RuleMetadata {
    id: PUBLIC_MUTABLE_FIELD,
    name: "public-mutable-field",
    description: "Business types do not expose public non-final fields",
    default_severity: Severity::Error,
    category: RuleCategory::Architecture,
    docs_url: rule_docs!("arch-domain-01"),
    example: Some("private BigDecimal amount;\n\npublic BigDecimal amount() {\n    return amount;\n}"),
};

impl Rule for PublicMutableField {
    fn metadata(&self) -> &RuleMetadata {
        &PUBLIC_MUTABLE_FIELD_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, ctx: &LintContext) -> Vec<Diagnostic> {
        if !in_business_package(root, ctx) {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        root.walk(&mut |node, ancestors| {
            if node.kind != NodeKind::FieldDeclaration {
                return;
            }
            // Field -> ClassBody/EnumBody -> owning type declaration
            let [.., owner, body] = ancestors else {
                return;
            };
            if !matches!(body.kind, NodeKind::ClassBody | NodeKind::EnumBody)
                || !matches!(
                    owner.kind,
                    NodeKind::ClassDeclaration
                        | NodeKind::EnumDeclaration
                        | NodeKind::RecordDeclaration
                )
            {
                return;
            }
            if !has_modifier(node, "public") || has_modifier(node, "final") {
                return;
            }
            let Some(field) = node
                .child_node(NodeKind::VariableDeclarator)
                .and_then(Node::name_token)
            else {
                return;
            };
            let owner_name = type_name(owner).map_or("<anonymous>", |t| t.text.as_str());
            diagnostics.push(
                PUBLIC_MUTABLE_FIELD_METADATA
                    .diagnostic(
                        source,
                        node.span.start.line,
                        node.span.start.column,
                        format!(
                            "Public field '{}' of business type '{owner_name}' must be final or private",
                            field.text
                        ),
                    )
                    .with_details("Expose state through methods so the type keeps its invariants"),
            );
        });
        diagnostics
    }
}

/// Business code importing persistence, JDBC or servlet packages
pub struct InfrastructureImport;

static INFRASTRUCTURE_IMPORT_METADATA: RuleMetadata = RuleMetadata {
    id: INFRASTRUCTURE_IMPORT,
    name: "infrastructure-import",
    description: "Business packages do not import infrastructure APIs",
    default_severity: Severity::Error,
    category: RuleCategory::Architecture,
    docs_url: rule_docs!("arch-domain-02"),
    example: None,
};

/// Infrastructure package an import name belongs to
fn infrastructure_package(name: &str) -> Option<&'static str> {
    INFRASTRUCTURE_PACKAGES.iter().copied().find(|package| {
        name.strip_prefix(package)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

impl Rule for InfrastructureImport {
    fn metadata(&self) -> &RuleMetadata {
        &INFRASTRUCTURE_IMPORT_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, ctx: &LintContext) -> Vec<Diagnostic> {
        if !in_business_package(root, ctx) {
            return Vec::new();
        }
        imports(root)
            .filter_map(|import| {
                let name = imported_name(import)?;
                let package = infrastructure_package(&name)?;
                Some(
                    INFRASTRUCTURE_IMPORT_METADATA
                        .diagnostic(
                            source,
                            import.span.start.line,
                            import.span.start.column,
                            format!("Business code imports infrastructure type '{name}'"),
                        )
                        .with_details(format!(
                            "Move code depending on '{package}' into an adapter outside the business packages"
                        )),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{lines, run};

    fn business() -> LintContext {
        LintContext::default()
            .with_business_packages(["com.acme.*.domain"])
            .unwrap()
    }

    #[test]
    fn test_public_mutable_fields() {
        let source = "package com.acme.billing.domain;\n\npublic class Invoice {\n    public int total;\n    public final String id = \"\";\n    private int count;\n    public static int created;\n\n    interface Limits {\n        int MAX = 3;\n    }\n}\n";
        let found = run(&PublicMutableField, source, &business());
        assert_eq!(lines(&found), vec![4, 7]);
        assert_eq!(
            found[0].message,
            "Public field 'total' of business type 'Invoice' must be final or private"
        );
        assert_eq!(found[0].location.column, 5);
    }

    #[test]
    fn test_non_business_package_is_ignored() {
        let source = "package com.acme.billing.web;\n\npublic class Form {\n    public int total;\n}\n";
        assert!(run(&PublicMutableField, source, &business()).is_empty());

        let source = "public class Form {\n    public int total;\n}\n";
        assert!(run(&PublicMutableField, source, &business()).is_empty());
    }

    #[test]
    fn test_infrastructure_imports() {
        let source = "package com.acme.billing.domain;\n\nimport java.sql.Connection;\nimport java.sqlx.Other;\nimport jakarta.persistence.*;\nimport java.util.List;\n\nclass Invoice {}\n";
        let found = run(&InfrastructureImport, source, &business());
        assert_eq!(lines(&found), vec![3, 5]);
        assert_eq!(
            found[0].message,
            "Business code imports infrastructure type 'java.sql.Connection'"
        );
        assert!(found[1].details.as_deref().unwrap().contains("'jakarta.persistence'"));
    }

    #[test]
    fn test_infrastructure_imports_outside_business_code() {
        let source = "package com.acme.billing.jdbc;\n\nimport java.sql.Connection;\n\nclass Store {}\n";
        assert!(run(&InfrastructureImport, source, &business()).is_empty());
    }
}
