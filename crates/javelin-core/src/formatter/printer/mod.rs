//! Alignment-aware printer
//!
//! A [`Printer`] is one print session: it owns the output sink, the spacing
//! state, the current indentation and the alignment stack. Nothing is shared
//! between sessions, so files can be printed on any number of threads.
//!
//! Layout decisions that depend on width (argument lists, ternaries) are
//! taken by rendering the subtree into a throwaway `Printer<Measurer>` that
//! starts from a copy of the current state; the real session is never
//! touched by a probe.
//!
//! Handlers live next to the grammar they print:
//! - `declarations`: compilation unit, imports, type bodies, members
//! - `statements`: blocks, control flow, switch
//! - `expressions`: chains, argument lists, ternaries, unary and casts

mod declarations;
mod expressions;
mod statements;

use super::options::FormatOptions;
use super::output::{Emitter, Measurer, Output};
use super::spacing::{SpacingState, space_before};
use crate::cst::trivia::{has_blank_line_before, has_comments};
use crate::cst::{CstNode, Node, NodeKind, Position, Token, Trivia};
use crate::error::JavelinError;
use crate::result::Result;

/// Spacing override for the next token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gap {
    /// Ask the spacing policy
    Auto,
    /// Glue to the previous token
    None,
    /// Always one space
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlignmentKind {
    Chain,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Alignment {
    column: usize,
    kind: AlignmentKind,
}

/// One-line rendering width of a subtree
#[derive(Debug, Clone, Copy)]
struct Measurement {
    width: usize,
    broken: bool,
}

/// An open brace-delimited body
#[derive(Debug, Clone, Copy)]
struct Body {
    /// Column of the closing brace
    base: usize,
    outer_indent: usize,
    mark: usize,
}

pub(crate) struct Printer<'a, O: Output> {
    options: &'a FormatOptions,
    out: O,
    spacing: SpacingState,
    /// Indentation column of statements/members in the innermost body
    indent: usize,
    alignments: Vec<Alignment>,
    /// Alignment stack depth at each open body
    block_marks: Vec<usize>,
    /// Only padding has been written on the current line
    line_start: bool,
    /// A line comment ended the line; the next token starts a new one
    pending_break: bool,
    next_gap: Option<Gap>,
    mark_next: bool,
    marked_column: Option<usize>,
    /// Column where the last token's text started
    token_column: usize,
    skip_leading_at: Option<Position>,
}

/// Print a CST with the given options
pub(crate) fn print(root: &CstNode, options: &FormatOptions) -> Result<String> {
    let mut printer = Printer::new(options, Emitter::new(options.indent_width));
    printer.element(root)?;
    printer.finish()
}

impl<'a> Printer<'a, Emitter> {
    fn finish(self) -> Result<String> {
        if !self.alignments.is_empty() || !self.block_marks.is_empty() {
            return Err(JavelinError::formatter_with_cause(
                "unbalanced printer state at end of input",
                format!(
                    "{} alignment(s) and {} bod(ies) still open",
                    self.alignments.len(),
                    self.block_marks.len()
                ),
            ));
        }
        Ok(self.out.finish())
    }
}

impl<'a, O: Output> Printer<'a, O> {
    pub(crate) fn new(options: &'a FormatOptions, out: O) -> Self {
        Self {
            options,
            out,
            spacing: SpacingState::default(),
            indent: 0,
            alignments: Vec::new(),
            block_marks: Vec::new(),
            line_start: true,
            pending_break: false,
            next_gap: None,
            mark_next: false,
            marked_column: None,
            token_column: 0,
            skip_leading_at: None,
        }
    }

    pub(crate) fn element(&mut self, element: &CstNode) -> Result<()> {
        match element {
            CstNode::Token(token) => {
                self.token(token, Gap::Auto);
                Ok(())
            }
            CstNode::Node(node) => self.node(node),
            CstNode::Error(error) => Err(JavelinError::formatter_with_cause(
                "cannot print an unparsed region",
                format!("at {}:{}", error.span.start.line, error.span.start.column),
            )),
        }
    }

    fn children(&mut self, node: &Node) -> Result<()> {
        for child in &node.children {
            self.element(child)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node) -> Result<()> {
        if self.out.should_stop() {
            return Ok(());
        }
        match node.kind {
            NodeKind::CompilationUnit => self.compilation_unit(node),
            NodeKind::ClassDeclaration
            | NodeKind::InterfaceDeclaration
            | NodeKind::EnumDeclaration
            | NodeKind::RecordDeclaration
            | NodeKind::AnnotationTypeDeclaration
            | NodeKind::FieldDeclaration
            | NodeKind::MethodDeclaration
            | NodeKind::ConstructorDeclaration
            | NodeKind::Initializer
            | NodeKind::EnumConstant => self.declaration(node),
            NodeKind::ClassBody => self.class_body(node),
            NodeKind::EnumBody => self.enum_body(node),
            NodeKind::Block => self.block(node),
            NodeKind::IfStatement
            | NodeKind::ForStatement
            | NodeKind::EnhancedForStatement
            | NodeKind::WhileStatement => self.control_statement(node),
            NodeKind::DoStatement => self.do_statement(node),
            NodeKind::TryStatement => self.try_statement(node),
            NodeKind::SwitchBlock => self.switch_block(node),
            NodeKind::SwitchGroup => self.switch_group(node),
            NodeKind::LabeledStatement => self.labeled_statement(node),
            NodeKind::PostfixExpression => self.postfix(node),
            NodeKind::ConditionalExpression => self.conditional(node),
            NodeKind::UnaryExpression => self.unary(node),
            NodeKind::CastExpression => self.cast(node),
            NodeKind::PostIncrement => self.post_increment(node),
            NodeKind::MethodCall => self.method_call(node),
            NodeKind::Arguments | NodeKind::ArrayInitializer | NodeKind::ElementValueArray => {
                self.list(node, self.options.align_arguments)
            }
            NodeKind::FormalParameters | NodeKind::RecordHeader => {
                self.list(node, self.options.align_parameters)
            }
            NodeKind::PackageDeclaration
            | NodeKind::ImportDeclaration
            | NodeKind::QualifiedName
            | NodeKind::Modifiers
            | NodeKind::Annotation
            | NodeKind::AnnotationArguments
            | NodeKind::ElementValuePair
            | NodeKind::TypeParameters
            | NodeKind::TypeParameter
            | NodeKind::TypeArguments
            | NodeKind::Type
            | NodeKind::WildcardType
            | NodeKind::ExtendsClause
            | NodeKind::ImplementsClause
            | NodeKind::PermitsClause
            | NodeKind::ThrowsClause
            | NodeKind::EmptyDeclaration
            | NodeKind::DefaultValue
            | NodeKind::FormalParameter
            | NodeKind::VariableDeclarator
            | NodeKind::LocalVariableDeclaration
            | NodeKind::ExpressionStatement
            | NodeKind::ElseClause
            | NodeKind::ForInit
            | NodeKind::ForUpdate
            | NodeKind::ResourceSpecification
            | NodeKind::Resource
            | NodeKind::CatchClause
            | NodeKind::CatchParameter
            | NodeKind::FinallyClause
            | NodeKind::SwitchStatement
            | NodeKind::SwitchRule
            | NodeKind::SwitchLabel
            | NodeKind::Guard
            | NodeKind::ReturnStatement
            | NodeKind::ThrowStatement
            | NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::YieldStatement
            | NodeKind::SynchronizedStatement
            | NodeKind::AssertStatement
            | NodeKind::EmptyStatement
            | NodeKind::Assignment
            | NodeKind::Lambda
            | NodeKind::LambdaParameters
            | NodeKind::BinaryExpression
            | NodeKind::InstanceofExpression
            | NodeKind::ParenthesizedExpression
            | NodeKind::ObjectCreation
            | NodeKind::ArrayCreation
            | NodeKind::SwitchExpression
            | NodeKind::MemberSelect
            | NodeKind::Invocation
            | NodeKind::ArrayAccess
            | NodeKind::MethodReference
            | NodeKind::TypePattern
            | NodeKind::RecordPattern => self.children(node),
        }
    }

    // ---- tokens and trivia ----

    pub(crate) fn token(&mut self, token: &Token, gap: Gap) {
        if self.out.should_stop() {
            return;
        }
        if self.skip_leading_at == Some(token.span.start) {
            self.skip_leading_at = None;
        } else {
            self.leading_comments(&token.leading);
        }
        if token.text.is_empty() {
            return;
        }
        self.text(&token.text, gap);
        self.trailing_comments(&token.trailing);
    }

    fn text(&mut self, text: &str, gap: Gap) {
        if self.pending_break {
            let column = self.continuation_column();
            self.newline_at(column);
        }
        let gap = self.next_gap.take().unwrap_or(gap);
        if !self.line_start {
            let space = match gap {
                Gap::Auto => space_before(&self.spacing, text),
                Gap::None => false,
                Gap::Space => true,
            };
            if space {
                self.out.push_text(" ");
            }
        }
        self.token_column = self.out.column();
        if self.mark_next {
            self.mark_next = false;
            self.marked_column = Some(self.token_column);
        }
        self.out.push_text(text);
        self.spacing.record(text);
        self.line_start = false;
    }

    /// Comments before a token
    ///
    /// A comment that starts a line stays on its own line at the current
    /// column, one that follows code on the same line stays there. A line
    /// comment, or a comment followed by a line break, ends the line; after
    /// any other comment the spacing policy places the next token.
    fn leading_comments(&mut self, trivia: &[Trivia]) {
        if !has_comments(trivia) {
            return;
        }
        let mut breaks = 0;
        let mut seen_comment = false;
        let mut on_own_line = false;
        for (index, piece) in trivia.iter().enumerate() {
            if let Trivia::Whitespace(text) = piece {
                breaks += text.matches('\n').count();
                continue;
            }
            let ends_line = matches!(piece, Trivia::LineComment(_))
                || trivia[index + 1..]
                    .iter()
                    .take_while(|next| next.is_whitespace())
                    .any(|next| next.newline_count() > 0);

            let own_line = breaks > 0 || self.line_start;
            if own_line {
                if !self.line_start {
                    let column = self.continuation_column();
                    self.newline_at(column);
                } else if seen_comment && breaks >= 2 {
                    let column = self.out.column();
                    self.newline_at(column);
                }
            } else if space_before(&self.spacing, piece.text()) {
                self.out.push_text(" ");
            }

            let column = self.out.column();
            self.comment(piece, column);
            if ends_line {
                let column = if own_line {
                    column
                } else {
                    self.continuation_column()
                };
                self.newline_at(column);
                on_own_line = true;
            } else {
                self.next_gap = Some(Gap::Auto);
                self.line_start = false;
                on_own_line = false;
            }
            breaks = 0;
            seen_comment = true;
        }
        if on_own_line && breaks >= 2 {
            let column = self.out.column();
            self.newline_at(column);
        }
    }

    fn trailing_comments(&mut self, trivia: &[Trivia]) {
        for piece in trivia {
            match piece {
                Trivia::LineComment(text) => {
                    self.out.push_text(" ");
                    self.out.push_text(text.trim_end());
                    self.out.mark_broken();
                    self.pending_break = true;
                }
                Trivia::BlockComment(_) => {
                    self.out.push_text(" ");
                    let column = self.out.column();
                    self.comment(piece, column);
                    self.next_gap = Some(Gap::Auto);
                }
                Trivia::Whitespace(_) => {}
            }
        }
    }

    /// Print one comment at the current position
    ///
    /// Block comments whose continuation lines all start with `*` are
    /// re-aligned so the stars line up under the opening `/*` at `column`;
    /// other multi-line comments keep their lines as written.
    fn comment(&mut self, comment: &Trivia, column: usize) {
        let text = comment.text();
        let starred = text.lines().skip(1).all(|line| line.trim_start().starts_with('*'));
        for (index, line) in text.lines().enumerate() {
            if index > 0 {
                self.out.push_newline();
                if starred {
                    self.out.push_text(&self.options.padding(column + 1));
                }
            }
            if index > 0 && starred {
                self.out.push_text(line.trim());
            } else {
                self.out.push_text(line.trim_end());
            }
        }
        self.spacing.record(text);
    }

    // ---- lines and indentation ----

    fn newline_at(&mut self, column: usize) {
        self.out.push_newline();
        self.out.push_text(&self.options.padding(column));
        self.spacing.record_newline();
        self.line_start = true;
        self.pending_break = false;
    }

    /// Start a new line at `column`, after one empty line if `blank`
    fn line_break(&mut self, column: usize, blank: bool) {
        if blank {
            self.out.push_newline();
        }
        self.newline_at(column);
    }

    /// Column for a forced break inside an expression
    fn continuation_column(&self) -> usize {
        self.top_alignment()
            .map_or(self.indent + 2 * self.options.indent_width, |a| a.column)
    }

    // ---- alignment stack ----

    /// Innermost alignment pushed since the current body opened
    fn top_alignment(&self) -> Option<Alignment> {
        let mark = self.block_marks.last().copied().unwrap_or(0);
        self.alignments.get(mark..).and_then(|open| open.last().copied())
    }

    fn in_breaking_chain(&self) -> bool {
        let mark = self.block_marks.last().copied().unwrap_or(0);
        self.alignments
            .get(mark..)
            .is_some_and(|open| open.iter().any(|a| a.kind == AlignmentKind::Chain))
    }

    fn push_alignment(&mut self, column: usize, kind: AlignmentKind) {
        self.alignments.push(Alignment { column, kind });
    }

    fn pop_alignment(&mut self, kind: AlignmentKind) -> Result<()> {
        let mark = self.block_marks.last().copied().unwrap_or(0);
        if self.alignments.len() <= mark {
            return Err(JavelinError::formatter_with_cause(
                "alignment stack underflow",
                format!("popping {kind:?} with {} open", self.alignments.len()),
            ));
        }
        match self.alignments.pop() {
            Some(top) if top.kind == kind => Ok(()),
            top => Err(JavelinError::formatter_with_cause(
                "alignment stack mismatch",
                format!("expected {kind:?}, found {top:?}"),
            )),
        }
    }

    // ---- bodies ----

    /// Enter a brace-delimited body; its contents indent one level past
    /// the innermost alignment opened since the enclosing body, if any
    fn open_body(&mut self) -> Body {
        let base = self.top_alignment().map_or(self.indent, |a| a.column);
        let body = Body {
            base,
            outer_indent: self.indent,
            mark: self.alignments.len(),
        };
        self.block_marks.push(body.mark);
        self.indent = base + self.options.indent_width;
        body
    }

    /// Print the closing brace of a body; comments before it stay inside
    fn close_body(&mut self, body: Body, close: &Token) -> Result<()> {
        if has_comments(&close.leading) {
            let blank = has_blank_line_before(&close.leading);
            self.line_break(self.indent, blank);
            self.leading_comments(&close.leading);
            self.skip_leading_at = Some(close.span.start);
        }

        match self.block_marks.pop() {
            Some(mark) if mark == body.mark && self.alignments.len() == mark => {}
            mark => {
                return Err(JavelinError::formatter_with_cause(
                    "alignment left open across a body",
                    format!(
                        "body mark {mark:?}, expected {}, {} alignment(s) open",
                        body.mark,
                        self.alignments.len()
                    ),
                ));
            }
        }
        self.indent = body.outer_indent;

        if self.line_start {
            self.out.clear_padding();
            self.out.push_text(&self.options.padding(body.base));
            self.pending_break = false;
        } else {
            self.newline_at(body.base);
        }
        self.token(close, Gap::Auto);
        Ok(())
    }

    /// Whether a delimited node prints as an empty `{}` pair
    fn is_empty_body(&self, items: &[CstNode], close: &Token) -> bool {
        items.is_empty() && !has_comments(&close.leading) && !self.pending_break
    }

    /// Split a `open items.. close` node
    fn delimited<'n>(&self, node: &'n Node) -> Result<(&'n Token, &'n [CstNode], &'n Token)> {
        let malformed = || {
            JavelinError::formatter_with_cause(
                "malformed delimited node",
                format!("{:?} at {}:{}", node.kind, node.span.start.line, node.span.start.column),
            )
        };
        let (first, rest) = node.children.split_first().ok_or_else(malformed)?;
        let (last, items) = rest.split_last().ok_or_else(malformed)?;
        match (first.as_token(), last.as_token()) {
            (Some(open), Some(close)) => Ok((open, items, close)),
            _ => Err(malformed()),
        }
    }

    // ---- measurement ----

    /// Render `node` into a probe starting from the current state
    fn measure(&self, node: &Node) -> Measurement {
        let mut probe = Printer {
            options: self.options,
            out: Measurer::new(
                self.out.column(),
                self.options.line_width,
                self.options.indent_width,
            ),
            spacing: self.spacing.clone(),
            indent: self.indent,
            alignments: self.alignments.clone(),
            block_marks: self.block_marks.clone(),
            line_start: self.line_start,
            pending_break: self.pending_break,
            next_gap: self.next_gap,
            mark_next: false,
            marked_column: None,
            token_column: self.token_column,
            skip_leading_at: self.skip_leading_at,
        };
        let printed = probe.node(node);
        Measurement {
            width: probe.out.width(),
            broken: printed.is_err() || probe.out.is_broken(),
        }
    }

    /// Whether `node` renders on the current line within the width limit
    fn fits(&self, node: &Node) -> bool {
        let measurement = self.measure(node);
        !measurement.broken && self.out.column() + measurement.width <= self.options.line_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse;

    fn print_source(source: &str, options: &FormatOptions) -> String {
        let parse = parse(source);
        assert!(parse.is_ok(), "{:?}", parse.errors);
        print(&parse.root, options).unwrap()
    }

    #[test]
    fn test_pop_mismatch_is_an_error() {
        let options = FormatOptions::default();
        let mut printer = Printer::new(&options, Emitter::new(4));
        printer.push_alignment(4, AlignmentKind::List);
        let err = printer.pop_alignment(AlignmentKind::Chain).unwrap_err();
        assert!(err.to_string().contains("alignment stack mismatch"));
        assert!(printer.pop_alignment(AlignmentKind::List).is_err());
    }

    #[test]
    fn test_pop_below_body_mark_is_an_error() {
        let options = FormatOptions::default();
        let mut printer = Printer::new(&options, Emitter::new(4));
        printer.push_alignment(8, AlignmentKind::Chain);
        let _body = printer.open_body();
        assert!(printer.pop_alignment(AlignmentKind::Chain).is_err());
    }

    #[test]
    fn test_unbalanced_state_fails_finish() {
        let options = FormatOptions::default();
        let mut printer = Printer::new(&options, Emitter::new(4));
        printer.push_alignment(0, AlignmentKind::List);
        assert!(printer.finish().is_err());
    }

    #[test]
    fn test_body_base_follows_alignment() {
        let options = FormatOptions::default();
        let mut printer = Printer::new(&options, Emitter::new(4));
        printer.indent = 4;
        printer.push_alignment(12, AlignmentKind::Chain);
        let body = printer.open_body();
        assert_eq!(body.base, 12);
        assert_eq!(printer.indent, 16);
        assert!(printer.top_alignment().is_none());
        assert!(!printer.in_breaking_chain());
    }

    #[test]
    fn test_measure_leaves_session_untouched() {
        let options = FormatOptions::default();
        let parse = parse("class A { void f() { g(a, b); } }");
        let call = parse
            .root
            .descendants()
            .into_iter()
            .find(|n| n.kind == NodeKind::Arguments)
            .unwrap();

        let mut printer = Printer::new(&options, Emitter::new(4));
        printer.spacing.record("g");
        let before = printer.spacing.clone();
        let measurement = printer.measure(call);
        assert_eq!(measurement.width, "(a, b)".len());
        assert!(!measurement.broken);
        assert_eq!(printer.spacing, before);
        assert!(printer.out.is_empty());
    }

    #[test]
    fn test_trailing_line_comment_forces_break() {
        let out = print_source(
            "class A { void f() { g(a, // first\n b); } }",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "class A {\n    void f() {\n        g(a, // first\n                b);\n    }\n}\n"
        );
    }

    #[test]
    fn test_comment_before_closing_brace_stays_inside() {
        let out = print_source(
            "class A {\n  void f() {\n    g();\n    // done\n  }\n}\n",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "class A {\n    void f() {\n        g();\n        // done\n    }\n}\n"
        );
    }

    #[test]
    fn test_javadoc_is_reindented() {
        let source = "class A {\n/**\n      * Doc.\n      */\nvoid f() {}\n}\n";
        let out = print_source(source, &FormatOptions::default());
        assert_eq!(out, "class A {\n    /**\n     * Doc.\n     */\n    void f() {}\n}\n");
    }
}
