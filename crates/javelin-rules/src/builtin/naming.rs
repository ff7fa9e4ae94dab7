//! Naming convention rules
//!
//! - Type names are UpperCamelCase
//! - Method names are lowerCamelCase
//! - `static final` fields are UPPER_SNAKE_CASE

use crate::context::LintContext;
use crate::engine::{Rule, RuleCategory, RuleMetadata};
use javelin_core::cst::{CstNode, Node, NodeKind, Token, TokenKind};
use javelin_core::{Diagnostic, Severity, SourceFile};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rule ID for type naming
pub const TYPE_NAMING: &str = "STYLE-NAMING-01";

/// Rule ID for method naming
pub const METHOD_NAMING: &str = "STYLE-NAMING-02";

/// Rule ID for constant naming
pub const CONSTANT_NAMING: &str = "STYLE-NAMING-03";

static UPPER_CAMEL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").expect("upper camel case pattern is valid"));

static LOWER_CAMEL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").expect("lower camel case pattern is valid"));

static UPPER_SNAKE_CASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$").expect("upper snake case pattern is valid")
});

/// Serialization constant exempt from constant naming
const SERIAL_VERSION_UID: &str = "serialVersionUID";

/// Check if a name is UpperCamelCase (`OrderService`, `HttpClient2`)
pub fn is_upper_camel_case(name: &str) -> bool {
    UPPER_CAMEL_CASE.is_match(name)
}

/// Check if a name is lowerCamelCase (`placeOrder`, `toString`)
pub fn is_lower_camel_case(name: &str) -> bool {
    LOWER_CAMEL_CASE.is_match(name)
}

/// Check if a name is UPPER_SNAKE_CASE (`MAX_RETRIES`, `TIMEOUT`)
pub fn is_upper_snake_case(name: &str) -> bool {
    UPPER_SNAKE_CASE.is_match(name)
}

/// Declared name of a type declaration
///
/// `record` is a contextual keyword lexed as an identifier, so the name of
/// a record is its second identifier.
pub(crate) fn type_name(declaration: &Node) -> Option<&Token> {
    let mut identifiers = declaration
        .child_tokens()
        .filter(|t| t.kind == TokenKind::Identifier);
    if declaration.kind == NodeKind::RecordDeclaration {
        identifiers.nth(1)
    } else {
        identifiers.next()
    }
}

/// Check if the declaration's modifiers include `keyword`
pub(crate) fn has_modifier(declaration: &Node, keyword: &str) -> bool {
    declaration
        .child_node(NodeKind::Modifiers)
        .is_some_and(|modifiers| modifiers.has_token(keyword))
}

fn name_diagnostic(
    metadata: &RuleMetadata,
    source: &SourceFile,
    name: &Token,
    message: String,
) -> Diagnostic {
    metadata.diagnostic(
        source,
        name.span.start.line,
        name.span.start.column,
        message,
    )
}

/// Type names must be UpperCamelCase
pub struct TypeNaming;

static TYPE_NAMING_METADATA: RuleMetadata = RuleMetadata {
    id: TYPE_NAMING,
    name: "type-naming",
    description: "Class, interface, enum, record and annotation names are UpperCamelCase",
    default_severity: Severity::Warning,
    category: RuleCategory::Style,
    docs_url: rule_docs!("style-naming-01"),
    example: Some("class OrderService {}"),
};

impl Rule for TypeNaming {
    fn metadata(&self) -> &RuleMetadata {
        &TYPE_NAMING_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        root.descendants()
            .into_iter()
            .filter(|node| node.kind.is_type_declaration())
            .filter_map(type_name)
            .filter(|name| !is_upper_camel_case(&name.text))
            .map(|name| {
                name_diagnostic(
                    &TYPE_NAMING_METADATA,
                    source,
                    name,
                    format!("Type name '{}' should be UpperCamelCase", name.text),
                )
            })
            .collect()
    }
}

/// Method names must be lowerCamelCase
pub struct MethodNaming;

static METHOD_NAMING_METADATA: RuleMetadata = RuleMetadata {
    id: METHOD_NAMING,
    name: "method-naming",
    description: "Method names are lowerCamelCase",
    default_severity: Severity::Warning,
    category: RuleCategory::Style,
    docs_url: rule_docs!("style-naming-02"),
    example: Some("void placeOrder() {}"),
};

impl Rule for MethodNaming {
    fn metadata(&self) -> &RuleMetadata {
        &METHOD_NAMING_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        root.descendants()
            .into_iter()
            .filter(|node| node.kind == NodeKind::MethodDeclaration)
            .filter_map(Node::name_token)
            .filter(|name| !is_lower_camel_case(&name.text))
            .map(|name| {
                name_diagnostic(
                    &METHOD_NAMING_METADATA,
                    source,
                    name,
                    format!("Method name '{}' should be lowerCamelCase", name.text),
                )
            })
            .collect()
    }
}

/// `static final` fields must be UPPER_SNAKE_CASE
///
/// Only explicit modifiers count; implicitly static interface fields are
/// not checked.
pub struct ConstantNaming;

static CONSTANT_NAMING_METADATA: RuleMetadata = RuleMetadata {
    id: CONSTANT_NAMING,
    name: "constant-naming",
    description: "static final fields are UPPER_SNAKE_CASE",
    default_severity: Severity::Warning,
    category: RuleCategory::Style,
    docs_url: rule_docs!("style-naming-03"),
    example: Some("private static final int MAX_RETRIES = 3;"),
};

impl Rule for ConstantNaming {
    fn metadata(&self) -> &RuleMetadata {
        &CONSTANT_NAMING_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        root.descendants()
            .into_iter()
            .filter(|node| node.kind == NodeKind::FieldDeclaration)
            .filter(|field| has_modifier(field, "static") && has_modifier(field, "final"))
            .flat_map(|field| field.child_nodes(NodeKind::VariableDeclarator))
            .filter_map(Node::name_token)
            .filter(|name| !name.is(SERIAL_VERSION_UID) && !is_upper_snake_case(&name.text))
            .map(|name| {
                name_diagnostic(
                    &CONSTANT_NAMING_METADATA,
                    source,
                    name,
                    format!("Constant '{}' should be UPPER_SNAKE_CASE", name.text),
                )
            })
            .collect()
    }
}
