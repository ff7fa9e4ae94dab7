//! Built-in lint rules
//!
//! Rules are registered in a fixed order; the analyzer reports their
//! diagnostics in that order.

/// Documentation anchor for a rule id
macro_rules! rule_docs {
    ($anchor:literal) => {
        Some(concat!(
            "https://github.com/javelin-style/javelin/blob/main/docs/rules.md#",
            $anchor
        ))
    };
}

pub mod architecture;
pub mod best_practice;
pub mod formatting;
pub mod imports;
pub mod naming;

use crate::engine::Rule;
use javelin_core::cst::{CstNode, NodeKind};

pub use architecture::{InfrastructureImport, PublicMutableField};
pub use best_practice::{EmptyCatch, MissingBraces, SystemStreams};
pub use formatting::LineLength;
pub use imports::WildcardImport;
pub use naming::{ConstantNaming, MethodNaming, TypeNaming};

/// Every built-in rule in registration order
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(TypeNaming),
        Box::new(MethodNaming),
        Box::new(ConstantNaming),
        Box::new(LineLength),
        Box::new(WildcardImport),
        Box::new(EmptyCatch),
        Box::new(SystemStreams),
        Box::new(MissingBraces),
        Box::new(PublicMutableField),
        Box::new(InfrastructureImport),
    ]
}

/// Declared package of a compilation unit, `None` for the default package
pub(crate) fn package_name(root: &CstNode) -> Option<String> {
    root.as_node()?
        .child_node(NodeKind::PackageDeclaration)?
        .child_node(NodeKind::QualifiedName)
        .map(|name| name.compact_text())
}


#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::cst::parse;

    #[test]
    fn test_package_name() {
        let unit = parse("package com.acme.orders;\n\nclass A {}\n");
        assert_eq!(package_name(&unit.root).as_deref(), Some("com.acme.orders"));

        let unit = parse("class A {}\n");
        assert_eq!(package_name(&unit.root), None);
    }

    #[test]
    fn test_every_rule_has_documentation() {
        for rule in all_rules() {
            let docs = rule.metadata().docs_url.unwrap();
            assert!(docs.starts_with("https://"));
            assert!(docs.ends_with(&rule.id().to_lowercase()));
        }
    }
}
