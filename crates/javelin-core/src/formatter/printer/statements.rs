//! Blocks, control flow and switch

use super::{Gap, Printer};
use crate::cst::trivia::has_blank_line_before;
use crate::cst::{CstNode, Node, NodeKind};
use crate::formatter::output::Output;
use crate::result::Result;

fn is_block(element: &CstNode) -> bool {
    element.node_kind() == Some(NodeKind::Block)
}

impl<O: Output> Printer<'_, O> {
    pub(super) fn block(&mut self, node: &Node) -> Result<()> {
        let (open, statements, close) = self.delimited(node)?;
        self.token(open, Gap::Auto);
        if self.is_empty_body(statements, close) {
            self.token(close, Gap::Auto);
            return Ok(());
        }
        let body = self.open_body();
        self.statements(statements)?;
        self.close_body(body, close)
    }

    /// One statement per line; blank lines between them survive, collapsed
    fn statements(&mut self, statements: &[CstNode]) -> Result<()> {
        for (index, statement) in statements.iter().enumerate() {
            let blank = index > 0 && has_blank_line_before(statement.leading_trivia());
            self.line_break(self.indent, blank);
            self.element(statement)?;
        }
        Ok(())
    }

    /// Body of `if`/`for`/`while`/`do`/`else`: blocks stay on the header
    /// line, anything else goes on the next line one level deeper
    fn body(&mut self, body: &CstNode) -> Result<()> {
        if is_block(body) {
            return self.element(body);
        }
        let outer = self.indent;
        self.indent += self.options.indent_width;
        self.line_break(self.indent, false);
        let printed = self.element(body);
        self.indent = outer;
        printed
    }

    /// Keyword that continues a statement after a body (`else`, `catch`,
    /// `while`): joined to a closing brace, otherwise on its own line
    fn continue_after(&mut self, body: &CstNode) {
        if !is_block(body) || self.pending_break {
            self.line_break(self.indent, false);
        }
    }

    /// `if`, `for`, enhanced `for` and `while`
    pub(super) fn control_statement(&mut self, node: &Node) -> Result<()> {
        let body_index = match node.kind {
            NodeKind::IfStatement => 2,
            _ => node.children.len().saturating_sub(1),
        };
        for (index, child) in node.children.iter().enumerate() {
            if index == body_index {
                self.body(child)?;
            } else if let CstNode::Node(clause) = child
                && clause.kind == NodeKind::ElseClause
            {
                if let Some(then_body) = node.children.get(body_index) {
                    self.continue_after(then_body);
                }
                self.else_clause(clause)?;
            } else {
                self.element(child)?;
            }
        }
        Ok(())
    }

    fn else_clause(&mut self, node: &Node) -> Result<()> {
        for child in &node.children {
            match child {
                CstNode::Node(nested) if nested.kind == NodeKind::IfStatement => {
                    self.node(nested)?;
                }
                CstNode::Node(_) => self.body(child)?,
                CstNode::Token(_) | CstNode::Error(_) => self.element(child)?,
            }
        }
        Ok(())
    }

    /// `do body while (cond);`
    pub(super) fn do_statement(&mut self, node: &Node) -> Result<()> {
        let mut body = None;
        for child in &node.children {
            match child {
                CstNode::Token(keyword) if keyword.text == "while" => {
                    if let Some(body) = body {
                        self.continue_after(body);
                    }
                    self.token(keyword, Gap::Auto);
                }
                CstNode::Node(_) if body.is_none() => {
                    self.body(child)?;
                    body = Some(child);
                }
                other => self.element(other)?,
            }
        }
        Ok(())
    }

    /// `try` with `} catch` and `} finally` joined to the previous brace
    pub(super) fn try_statement(&mut self, node: &Node) -> Result<()> {
        let mut previous: Option<&CstNode> = None;
        for child in &node.children {
            let clause = matches!(
                child.node_kind(),
                Some(NodeKind::CatchClause | NodeKind::FinallyClause)
            );
            if clause && let Some(previous) = previous {
                let body = match previous {
                    CstNode::Node(prev) if prev.kind != NodeKind::Block => {
                        prev.children.last().unwrap_or(previous)
                    }
                    _ => previous,
                };
                self.continue_after(body);
            }
            self.element(child)?;
            previous = Some(child);
        }
        Ok(())
    }

    pub(super) fn switch_block(&mut self, node: &Node) -> Result<()> {
        let (open, entries, close) = self.delimited(node)?;
        self.token(open, Gap::Auto);
        if self.is_empty_body(entries, close) {
            self.token(close, Gap::Auto);
            return Ok(());
        }
        let body = self.open_body();
        self.statements(entries)?;
        self.close_body(body, close)
    }

    /// `case A:` labels, each on its own line, then the statements one
    /// level deeper
    pub(super) fn switch_group(&mut self, node: &Node) -> Result<()> {
        let mut statements = &node.children[node.children.len()..];
        for (index, child) in node.children.iter().enumerate() {
            match child {
                CstNode::Node(label) if label.kind == NodeKind::SwitchLabel => {
                    if index > 0 {
                        self.line_break(self.indent, false);
                    }
                    self.node(label)?;
                }
                CstNode::Token(colon) if colon.text == ":" => self.token(colon, Gap::None),
                _ => {
                    statements = &node.children[index..];
                    break;
                }
            }
        }

        let outer = self.indent;
        self.indent += self.options.indent_width;
        let printed = self.statements(statements);
        self.indent = outer;
        printed
    }

    /// `label: statement`
    pub(super) fn labeled_statement(&mut self, node: &Node) -> Result<()> {
        for child in &node.children {
            match child {
                CstNode::Token(colon) if colon.text == ":" => self.token(colon, Gap::None),
                other => self.element(other)?,
            }
        }
        Ok(())
    }
}
