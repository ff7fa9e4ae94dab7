//! Import grouping
//!
//! Imports are partitioned by namespace prefix into fixed groups printed in
//! declaration order of [`ImportGroup`]. Within a group the original order
//! is kept; the text of each import is never changed.

use crate::cst::{Node, NodeKind};

/// Import categories in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportGroup {
    Java,
    Javax,
    Jakarta,
    Org,
    Com,
    Other,
    Static,
}

impl ImportGroup {
    /// Classify an `ImportDeclaration` node
    pub fn of(import: &Node) -> Self {
        if import.has_token("static") {
            return ImportGroup::Static;
        }
        let name = import
            .child_node(NodeKind::QualifiedName)
            .map(Node::compact_text)
            .unwrap_or_default();
        Self::for_name(&name)
    }

    /// Classify a dotted (non-static) import name
    pub fn for_name(name: &str) -> Self {
        const PREFIXES: &[(&str, ImportGroup)] = &[
            ("java.", ImportGroup::Java),
            ("javax.", ImportGroup::Javax),
            ("jakarta.", ImportGroup::Jakarta),
            ("org.", ImportGroup::Org),
            ("com.", ImportGroup::Com),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map_or(ImportGroup::Other, |(_, group)| *group)
    }
}

/// Stable partition of imports into non-empty groups, in group order
pub fn group_imports<'a>(imports: &[&'a Node]) -> Vec<Vec<&'a Node>> {
    let mut tagged: Vec<(ImportGroup, &'a Node)> =
        imports.iter().map(|import| (ImportGroup::of(import), *import)).collect();
    tagged.sort_by_key(|(group, _)| *group);

    let mut groups: Vec<Vec<&'a Node>> = Vec::new();
    let mut current = None;
    for (group, import) in tagged {
        if current != Some(group) {
            groups.push(Vec::new());
            current = Some(group);
        }
        if let Some(last) = groups.last_mut() {
            last.push(import);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;

    #[test]
    fn test_for_name() {
        assert_eq!(ImportGroup::for_name("java.util.List"), ImportGroup::Java);
        assert_eq!(ImportGroup::for_name("javax.inject.Inject"), ImportGroup::Javax);
        assert_eq!(ImportGroup::for_name("jakarta.ws.rs.GET"), ImportGroup::Jakarta);
        assert_eq!(ImportGroup::for_name("org.slf4j.Logger"), ImportGroup::Org);
        assert_eq!(ImportGroup::for_name("com.acme.Thing"), ImportGroup::Com);
        assert_eq!(ImportGroup::for_name("io.vertx.Vertx"), ImportGroup::Other);
        assert_eq!(ImportGroup::for_name("javaxx.Foo"), ImportGroup::Other);
    }

    #[test]
    fn test_group_imports_is_stable() {
        let source = "import static org.junit.Assert.*;\nimport com.b.B;\nimport java.util.Map;\nimport com.a.A;\nimport java.util.List;\n";
        let parse = parse(source);
        let imports: Vec<&Node> = parse
            .root
            .as_node()
            .map(|unit| unit.child_nodes(NodeKind::ImportDeclaration).collect())
            .unwrap_or_default();

        let groups = group_imports(&imports);
        let texts: Vec<Vec<String>> = groups
            .iter()
            .map(|group| group.iter().map(|import| import.compact_text()).collect())
            .collect();
        assert_eq!(
            texts,
            vec![
                vec!["importjava.util.Map;", "importjava.util.List;"],
                vec!["importcom.b.B;", "importcom.a.A;"],
                vec!["importstaticorg.junit.Assert.*;"],
            ]
        );
    }
}
