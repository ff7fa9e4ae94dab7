//! `@SuppressWarnings` handling
//!
//! A suppression covers the full line span of the declaration its
//! annotation decorates. Entries of the annotation that look like rule ids
//! (`FAMILY-CATEGORY-NN`) suppress that rule; `"all"` suppresses every rule.
//! Other entries (`"unchecked"`, `"rawtypes"`) belong to the compiler and
//! are ignored.

use javelin_core::Diagnostic;
use javelin_core::cst::{CstNode, Node, NodeKind, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Annotation name recognised as a suppression directive
pub const SUPPRESS_ANNOTATION: &str = "SuppressWarnings";

/// Entry suppressing every rule
pub const SUPPRESS_ALL: &str = "all";

static RULE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9]*-[A-Z][A-Z0-9]*-\d{2,}$").expect("rule id pattern is valid")
});

/// Check if a string has the shape of a rule id
pub fn is_rule_id(text: &str) -> bool {
    RULE_ID.is_match(text)
}

/// Rules silenced over an inclusive line range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    pub rule_ids: BTreeSet<String>,
    pub all: bool,
    pub lines: RangeInclusive<usize>,
}

impl Suppression {
    /// Check if this suppression silences `rule_id` on `line`
    pub fn covers(&self, rule_id: &str, line: usize) -> bool {
        self.lines.contains(&line) && (self.all || self.rule_ids.contains(rule_id))
    }
}

/// Collect every suppression in the tree
///
/// Annotations outside any declaration and annotations naming no rule id
/// produce nothing.
pub fn extract_suppressions(root: &CstNode) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    root.walk(&mut |node, ancestors| {
        if node.kind != NodeKind::Annotation || !is_suppress_annotation(node) {
            return;
        }
        let (rule_ids, all) = suppressed_entries(node);
        if rule_ids.is_empty() && !all {
            return;
        }
        let Some(declaration) = ancestors.iter().rev().find(|a| a.kind.is_declaration()) else {
            return;
        };
        suppressions.push(Suppression {
            rule_ids,
            all,
            lines: declaration.span.lines(),
        });
    });
    tracing::trace!(count = suppressions.len(), "extracted suppressions");
    suppressions
}

/// Check if any suppression covers the diagnostic's rule at its line
pub fn is_suppressed(diagnostic: &Diagnostic, suppressions: &[Suppression]) -> bool {
    suppressions
        .iter()
        .any(|s| s.covers(&diagnostic.rule_id, diagnostic.line()))
}

fn is_suppress_annotation(annotation: &Node) -> bool {
    annotation
        .child_node(NodeKind::QualifiedName)
        .and_then(|name| name.child_tokens().filter(|t| t.kind == TokenKind::Identifier).last())
        .is_some_and(|last| last.is(SUPPRESS_ANNOTATION))
}

/// String entries of the annotation's single argument
fn suppressed_entries(annotation: &Node) -> (BTreeSet<String>, bool) {
    let mut rule_ids = BTreeSet::new();
    let mut all = false;

    let Some(arguments) = annotation.child_node(NodeKind::AnnotationArguments) else {
        return (rule_ids, all);
    };
    for literal in string_literals(arguments) {
        if literal == SUPPRESS_ALL {
            all = true;
        } else if is_rule_id(&literal) {
            rule_ids.insert(literal);
        }
    }
    (rule_ids, all)
}

/// String literals given as the value: a bare literal, an array of
/// literals, or `value = ...`
fn string_literals(arguments: &Node) -> Vec<String> {
    let mut literals = Vec::new();
    for child in &arguments.children {
        match child {
            CstNode::Token(token) if token.kind == TokenKind::StringLiteral => {
                literals.extend(unquote(&token.text));
            }
            CstNode::Node(node) if node.kind == NodeKind::ElementValueArray => {
                literals.extend(array_literals(node));
            }
            CstNode::Node(node) if node.kind == NodeKind::ElementValuePair => {
                if node.name_token().is_some_and(|name| name.is("value")) {
                    literals.extend(string_literals(node));
                }
            }
            _ => {}
        }
    }
    literals
}

fn array_literals(array: &Node) -> Vec<String> {
    array
        .child_tokens()
        .filter(|t| t.kind == TokenKind::StringLiteral)
        .filter_map(|t| unquote(&t.text))
        .collect()
}

fn unquote(literal: &str) -> Option<String> {
    literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::cst::parse;

    fn suppressions(source: &str) -> Vec<Suppression> {
        let parse = parse(source);
        assert!(parse.is_ok(), "{:?}", parse.errors);
        extract_suppressions(&parse.root)
    }

    #[test]
    fn test_rule_id_shape() {
        assert!(is_rule_id("STYLE-NAMING-01"));
        assert!(is_rule_id("BEST-PRACTICE-123"));
        assert!(is_rule_id("ARCH-DOMAIN-02"));
        assert!(!is_rule_id("unchecked"));
        assert!(!is_rule_id("STYLE-NAMING-1"));
        assert!(!is_rule_id("style-naming-01"));
        assert!(!is_rule_id("STYLE-01"));
    }

    #[test]
    fn test_single_literal_on_method() {
        let source = "class A {\n    @SuppressWarnings(\"BEST-PRACTICE-02\")\n    void f() {\n        g();\n    }\n}\n";
        let found = suppressions(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, 2..=5);
        assert!(found[0].covers("BEST-PRACTICE-02", 4));
        assert!(!found[0].covers("BEST-PRACTICE-01", 4));
        assert!(!found[0].covers("BEST-PRACTICE-02", 6));
    }

    #[test]
    fn test_array_and_compiler_entries() {
        let source = "@SuppressWarnings({\"unchecked\", \"STYLE-NAMING-01\", \"STYLE-FORMAT-01\"})\nclass a {\n}\n";
        let found = suppressions(source);
        assert_eq!(found.len(), 1);
        let ids: Vec<&str> = found[0].rule_ids.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["STYLE-FORMAT-01", "STYLE-NAMING-01"]);
        assert!(!found[0].all);
        assert_eq!(found[0].lines, 1..=3);
    }

    #[test]
    fn test_all_and_qualified_name() {
        let source = "class A {\n    @java.lang.SuppressWarnings(value = \"all\")\n    int x = 1;\n}\n";
        let found = suppressions(source);
        assert_eq!(found.len(), 1);
        assert!(found[0].all);
        assert!(found[0].covers("ANY-RULE-99", 3));
        assert!(!found[0].covers("ANY-RULE-99", 4));
    }

    #[test]
    fn test_only_compiler_entries_are_ignored() {
        let source = "class A {\n    @SuppressWarnings(\"unchecked\")\n    void f() {}\n}\n";
        assert!(suppressions(source).is_empty());
    }

    #[test]
    fn test_other_annotations_are_ignored() {
        let source = "class A {\n    @Deprecated\n    @Override\n    public String toString() { return \"\"; }\n}\n";
        assert!(suppressions(source).is_empty());
    }

    #[test]
    fn test_nearest_declaration_wins() {
        let source = "class A {\n    void f() {\n        @SuppressWarnings(\"BEST-PRACTICE-02\")\n        int x = 1;\n        g();\n    }\n}\n";
        let found = suppressions(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lines, 3..=4);
        assert!(!found[0].covers("BEST-PRACTICE-02", 5));
    }
}
