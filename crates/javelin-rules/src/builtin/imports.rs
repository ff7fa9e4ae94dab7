//! Import style rule

use crate::context::LintContext;
use crate::engine::{Rule, RuleCategory, RuleMetadata};
use javelin_core::cst::{CstNode, Node, NodeKind};
use javelin_core::{Diagnostic, Severity, SourceFile};

/// Rule ID for on-demand imports
pub const WILDCARD_IMPORT: &str = "STYLE-IMPORT-01";

/// Imported name without the `import`/`static` keywords, e.g. `java.util.*`
pub(crate) fn imported_name(import: &Node) -> Option<String> {
    import
        .child_node(NodeKind::QualifiedName)
        .map(Node::compact_text)
}

/// Import declarations of the compilation unit, in source order
pub(crate) fn imports(root: &CstNode) -> impl Iterator<Item = &Node> {
    root.as_node()
        .into_iter()
        .flat_map(|unit| unit.child_nodes(NodeKind::ImportDeclaration))
}

/// On-demand (`.*`) imports, static ones included
pub struct WildcardImport;

static WILDCARD_IMPORT_METADATA: RuleMetadata = RuleMetadata {
    id: WILDCARD_IMPORT,
    name: "wildcard-import",
    description: "Imports name each type explicitly instead of using `.*`",
    default_severity: Severity::Warning,
    category: RuleCategory::Style,
    docs_url: rule_docs!("style-import-01"),
    example: Some("import java.util.List;"),
};

impl Rule for WildcardImport {
    fn metadata(&self) -> &RuleMetadata {
        &WILDCARD_IMPORT_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        imports(root)
            .filter_map(|import| {
                let name = imported_name(import)?;
                name.ends_with(".*").then(|| {
                    WILDCARD_IMPORT_METADATA.diagnostic(
                        source,
                        import.span.start.line,
                        import.span.start.column,
                        format!("Avoid on-demand import '{name}'"),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{lines, run};

    #[test]
    fn test_on_demand_imports() {
        let source = "import java.util.*;\nimport java.util.List;\nimport static org.junit.Assert.*;\n\nclass A {}\n";
        let found = run(&WildcardImport, source, &LintContext::default());
        assert_eq!(lines(&found), vec![1, 3]);
        assert_eq!(found[0].message, "Avoid on-demand import 'java.util.*'");
        assert_eq!(found[1].message, "Avoid on-demand import 'org.junit.Assert.*'");
        assert_eq!(found[0].location.column, 1);
    }

    #[test]
    fn test_explicit_imports_pass() {
        let source = "package p;\n\nimport java.util.Map;\n\nclass A {}\n";
        assert!(run(&WildcardImport, source, &LintContext::default()).is_empty());
    }
}
