//! Compilation unit, imports, type bodies and member declarations

use super::{Gap, Printer};
use crate::cst::trivia::{has_blank_line_before, has_comments};
use crate::cst::{CstNode, Node, NodeKind, Token, TokenKind};
use crate::formatter::imports::group_imports;
use crate::formatter::output::Output;
use crate::result::Result;

/// Declarations without a body print without blank lines between them
/// when they are of the same kind (runs of fields, abstract methods)
fn same_bodyless_kind(previous: &CstNode, current: &CstNode) -> bool {
    let (Some(previous), Some(current)) = (previous.as_node(), current.as_node()) else {
        return false;
    };
    previous.kind == current.kind && is_bodyless(previous) && is_bodyless(current)
}

fn is_bodyless(node: &Node) -> bool {
    match node.kind {
        NodeKind::FieldDeclaration | NodeKind::EmptyDeclaration => true,
        NodeKind::MethodDeclaration => node.child_node(NodeKind::Block).is_none(),
        _ => false,
    }
}

impl<O: Output> Printer<'_, O> {
    pub(super) fn compilation_unit(&mut self, node: &Node) -> Result<()> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut declarations = Vec::new();
        let mut eof = None;
        for child in &node.children {
            match child {
                CstNode::Node(n) if n.kind == NodeKind::PackageDeclaration => package = Some(n),
                CstNode::Node(n) if n.kind == NodeKind::ImportDeclaration => imports.push(n),
                CstNode::Token(t) if t.kind == TokenKind::Eof => eof = Some(t),
                other => declarations.push(other),
            }
        }

        // Comments heading the file stay first even when the import they
        // are attached to moves
        let reorganize = self.options.reorganize_imports;
        if reorganize
            && let Some(CstNode::Node(first)) = node.children.first()
            && first.kind == NodeKind::ImportDeclaration
            && let Some(header) = first.children.first().and_then(CstNode::first_token)
            && has_comments(&header.leading)
        {
            self.leading_comments(&header.leading);
            self.skip_leading_at = Some(header.span.start);
        }

        if let Some(package) = package {
            self.node(package)?;
        }

        if reorganize {
            let groups = group_imports(&imports);
            tracing::trace!(imports = imports.len(), groups = groups.len(), "grouping imports");
            for group in groups {
                for (index, import) in group.into_iter().enumerate() {
                    self.top_level_break(index == 0);
                    self.node(import)?;
                }
            }
        } else {
            for (index, import) in imports.into_iter().enumerate() {
                self.top_level_break(index == 0 || has_blank_line_before(import.leading_trivia()));
                self.node(import)?;
            }
        }

        for declaration in declarations {
            self.top_level_break(true);
            self.element(declaration)?;
        }

        if let Some(eof) = eof {
            self.end_of_file(eof);
        }
        Ok(())
    }

    fn top_level_break(&mut self, blank: bool) {
        if self.out.is_empty() || self.line_start {
            return;
        }
        self.line_break(0, blank);
    }

    fn end_of_file(&mut self, eof: &Token) {
        if !has_comments(&eof.leading) {
            return;
        }
        if !self.out.is_empty() && !self.line_start {
            self.line_break(0, has_blank_line_before(&eof.leading));
        }
        self.leading_comments(&eof.leading);
    }

    /// Type or member declaration; leading annotations go on their own lines
    pub(super) fn declaration(&mut self, node: &Node) -> Result<()> {
        for child in &node.children {
            match child {
                CstNode::Node(modifiers) if modifiers.kind == NodeKind::Modifiers => {
                    self.declaration_modifiers(modifiers)?;
                }
                other => self.element(other)?,
            }
        }
        Ok(())
    }

    fn declaration_modifiers(&mut self, modifiers: &Node) -> Result<()> {
        let mut leading = true;
        for child in &modifiers.children {
            self.element(child)?;
            if leading && child.node_kind() == Some(NodeKind::Annotation) {
                self.line_break(self.indent, false);
            } else {
                leading = false;
            }
        }
        Ok(())
    }

    pub(super) fn class_body(&mut self, node: &Node) -> Result<()> {
        let (open, members, close) = self.delimited(node)?;
        self.token(open, Gap::Auto);
        if self.is_empty_body(members, close) {
            self.token(close, Gap::Auto);
            return Ok(());
        }
        let body = self.open_body();
        self.members(members, false)?;
        self.close_body(body, close)
    }

    fn members(&mut self, members: &[CstNode], blank_first: bool) -> Result<()> {
        let mut previous: Option<&CstNode> = None;
        for member in members {
            let blank = match previous {
                Some(previous) => {
                    has_blank_line_before(member.leading_trivia())
                        || !same_bodyless_kind(previous, member)
                }
                None => blank_first,
            };
            self.line_break(self.indent, blank);
            self.element(member)?;
            previous = Some(member);
        }
        Ok(())
    }

    /// Constants one per line, `;` glued to the last one, then members
    pub(super) fn enum_body(&mut self, node: &Node) -> Result<()> {
        let (open, items, close) = self.delimited(node)?;
        self.token(open, Gap::Auto);
        if self.is_empty_body(items, close) {
            self.token(close, Gap::Auto);
            return Ok(());
        }
        let body = self.open_body();

        let mut members = &items[items.len()..];
        let mut constants = 0;
        for (index, item) in items.iter().enumerate() {
            match item {
                CstNode::Node(constant) if constant.kind == NodeKind::EnumConstant => {
                    let blank = constants > 0 && has_blank_line_before(item.leading_trivia());
                    self.line_break(self.indent, blank);
                    self.node(constant)?;
                    constants += 1;
                }
                CstNode::Token(separator) if separator.text == ";" => {
                    if constants == 0 {
                        self.line_break(self.indent, false);
                    }
                    self.token(separator, Gap::Auto);
                    members = &items[index + 1..];
                    break;
                }
                other => self.element(other)?,
            }
        }
        self.members(members, true)?;
        self.close_body(body, close)
    }
}
