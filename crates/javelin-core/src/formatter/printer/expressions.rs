//! Call chains, delimited lists, ternaries and operator gluing

use super::{AlignmentKind, Gap, Printer};
use crate::cst::trivia::has_comments;
use crate::cst::{CstNode, Node, NodeKind, Token, TokenKind};
use crate::formatter::output::Output;
use crate::result::Result;

/// A postfix expression with at least two call continuations
fn is_call_chain(node: &Node) -> bool {
    node.kind == NodeKind::PostfixExpression
        && node.child_nodes(NodeKind::MethodCall).nth(1).is_some()
}

fn contains_chain_or_lambda(node: &Node) -> bool {
    node.children.iter().filter_map(CstNode::as_node).any(|child| {
        child.kind == NodeKind::Lambda || is_call_chain(child) || contains_chain_or_lambda(child)
    })
}

/// Comments among the list's own tokens; bodies nested in an item
/// (lambda blocks, anonymous classes, switch blocks) lay out on their own
fn has_list_comments(inner: &[CstNode], close: &Token) -> bool {
    fn visit(element: &CstNode) -> bool {
        match element {
            CstNode::Token(token) => has_comments(&token.leading) || has_comments(&token.trailing),
            CstNode::Node(node) => {
                !matches!(
                    node.kind,
                    NodeKind::Block | NodeKind::ClassBody | NodeKind::SwitchBlock
                ) && node.children.iter().any(visit)
            }
            CstNode::Error(_) => false,
        }
    }
    has_comments(&close.leading) || inner.iter().any(visit)
}

impl<O: Output> Printer<'_, O> {
    /// Receiver, then one call continuation per line aligned on the dots
    pub(super) fn postfix(&mut self, node: &Node) -> Result<()> {
        if self.out.is_measuring() || !self.options.align_chains || !is_call_chain(node) {
            return self.children(node);
        }
        let Some(first_call) = node
            .children
            .iter()
            .position(|c| c.node_kind() == Some(NodeKind::MethodCall))
        else {
            return self.children(node);
        };
        let (receiver, continuations) = node.children.split_at(first_call);

        // Align on the first member dot inside the receiver, else on the
        // dot of the first call
        let mut column = None;
        for part in receiver {
            if column.is_none() && part.node_kind() == Some(NodeKind::MemberSelect) {
                self.mark_next = true;
                self.element(part)?;
                column = self.marked_column.take();
            } else {
                self.element(part)?;
            }
        }
        let column = column.unwrap_or_else(|| self.out.column());
        tracing::trace!(column, "breaking call chain");

        self.push_alignment(column, AlignmentKind::Chain);
        let mut calls = 0;
        for part in continuations {
            if part.node_kind() == Some(NodeKind::MethodCall) {
                calls += 1;
                if calls > 1 {
                    self.line_break(column, false);
                }
            }
            self.element(part)?;
        }
        self.pop_alignment(AlignmentKind::Chain)
    }

    /// Arguments, parameters, record headers and array initializers
    ///
    /// A list with two or more items breaks one item per line, aligned
    /// after the opening delimiter, when its one-line rendering would end
    /// past the line width, when a comment among its items forces a line
    /// break, or when it holds a chain or lambda while a chain is already
    /// breaking around it. Measurement never breaks lists, chains or
    /// ternaries.
    pub(super) fn list(&mut self, node: &Node, enabled: bool) -> Result<()> {
        let (open, inner, close) = self.delimited(node)?;
        let items = inner.iter().filter(|c| !c.is_token(",")).count();
        if self.out.is_measuring() || !enabled || items < 2 {
            return self.children(node);
        }

        let measurement = self.measure(node);
        let overflows = self.out.column() + measurement.width > self.options.line_width;
        let commented = measurement.broken && has_list_comments(inner, close);
        let nested = self.in_breaking_chain() && contains_chain_or_lambda(node);
        if !overflows && !commented && !nested {
            return self.children(node);
        }
        tracing::trace!(kind = ?node.kind, items, overflows, commented, nested, "breaking list");

        self.token(open, Gap::Auto);
        let column = self.token_column + 1;
        self.push_alignment(column, AlignmentKind::List);
        let mut first = true;
        for child in inner {
            if child.is_token(",") {
                self.element(child)?;
                continue;
            }
            if !first {
                self.line_break(column, false);
            }
            first = false;
            self.element(child)?;
        }
        self.pop_alignment(AlignmentKind::List)?;
        self.token(close, Gap::Auto);
        Ok(())
    }

    /// `cond ? a : b`, or with `?` and `:` leading new lines aligned to the
    /// start of the condition when it does not fit
    pub(super) fn conditional(&mut self, node: &Node) -> Result<()> {
        let [condition, question, then_branch, colon, else_branch] = node.children.as_slice() else {
            return self.children(node);
        };
        if self.out.is_measuring() || self.fits(node) {
            return self.children(node);
        }

        self.mark_next = true;
        self.element(condition)?;
        let column = self.marked_column.take().unwrap_or(self.token_column);
        tracing::trace!(column, "breaking conditional");

        self.line_break(column, false);
        self.element(question)?;
        self.element(then_branch)?;
        self.line_break(column, false);
        self.element(colon)?;
        self.element(else_branch)
    }

    /// Prefix operators glue to their operand unless that would fuse two
    /// signs into an increment
    pub(super) fn unary(&mut self, node: &Node) -> Result<()> {
        let [operator, operand] = node.children.as_slice() else {
            return self.children(node);
        };
        self.element(operator)?;
        let sign = |text: &str| text.ends_with(['+', '-']);
        let fuses = operator.as_token().is_some_and(|t| sign(&t.text))
            && operand
                .first_token()
                .is_some_and(|t| t.text.starts_with(['+', '-']));
        self.next_gap = Some(if fuses { Gap::Space } else { Gap::None });
        self.element(operand)
    }

    /// `(Type) operand` with exactly one space after the cast
    pub(super) fn cast(&mut self, node: &Node) -> Result<()> {
        let Some((operand, head)) = node.children.split_last() else {
            return Ok(());
        };
        for child in head {
            self.element(child)?;
        }
        self.next_gap = Some(Gap::Space);
        self.element(operand)
    }

    pub(super) fn post_increment(&mut self, node: &Node) -> Result<()> {
        for child in &node.children {
            match child {
                CstNode::Token(operator) => self.token(operator, Gap::None),
                other => self.element(other)?,
            }
        }
        Ok(())
    }

    /// `.name(args)` or `.<T>name(args)`; the name hugs explicit type
    /// arguments
    pub(super) fn method_call(&mut self, node: &Node) -> Result<()> {
        let mut after_type_arguments = false;
        for child in &node.children {
            match child {
                CstNode::Token(name)
                    if after_type_arguments && name.kind == TokenKind::Identifier =>
                {
                    self.token(name, Gap::None);
                }
                other => self.element(other)?,
            }
            after_type_arguments = child.node_kind() == Some(NodeKind::TypeArguments);
        }
        Ok(())
    }
}
