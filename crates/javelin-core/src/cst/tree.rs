//! Owned CST data structure and traversal helpers
//!
//! The tree is immutable once built. Nodes have no parent pointers; callers
//! that need ancestry use [`CstNode::walk`], which threads an explicit
//! ancestor path through the traversal.

use super::syntax_kind::{NodeKind, TokenKind};
use super::trivia::{Trivia, trivia_text};
use serde::Serialize;

/// A 1-based line/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position after advancing over `text`
    pub fn advance(self, text: &str) -> Self {
        let mut pos = self;
        for ch in text.chars() {
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Source span: `start` is the first character, `end` the position just past
/// the last one (same line as the last character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`
    pub fn cover(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Inclusive line range covered by this span
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start.line..=self.end.line
    }
}

/// A terminal with its attached trivia
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub leading: Vec<Trivia>,
    pub trailing: Vec<Trivia>,
}

impl Token {
    /// Check if this token is the given keyword or identifier text
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// A non-terminal: a rule tag plus children in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<CstNode>,
    pub span: Span,
}

impl Node {
    /// Build a node; the span is derived from the first and last child
    pub fn new(kind: NodeKind, children: Vec<CstNode>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::default(),
        };
        Self {
            kind,
            children,
            span,
        }
    }

    /// Direct child nodes of a given kind
    pub fn child_nodes(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .filter_map(CstNode::as_node)
            .filter(move |n| n.kind == kind)
    }

    /// First direct child node of a given kind
    pub fn child_node(&self, kind: NodeKind) -> Option<&Node> {
        self.child_nodes(kind).next()
    }

    /// Direct child tokens
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(CstNode::as_token)
    }

    /// Check if a direct child token has the given text
    pub fn has_token(&self, text: &str) -> bool {
        self.child_tokens().any(|t| t.text == text)
    }

    /// Token texts concatenated without trivia
    pub fn compact_text(&self) -> String {
        self.children.iter().map(CstNode::compact_text).collect()
    }

    /// Leading trivia of this node's first terminal
    pub fn leading_trivia(&self) -> &[Trivia] {
        self.children.first().map_or(&[][..], CstNode::leading_trivia)
    }

    /// First direct identifier token (the declared name for declarations)
    pub fn name_token(&self) -> Option<&Token> {
        self.child_tokens()
            .find(|t| t.kind == TokenKind::Identifier)
    }
}

/// Region the parser could not classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNode {
    pub tokens: Vec<Token>,
    pub span: Span,
}

/// A CST element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CstNode {
    Token(Token),
    Node(Node),
    Error(ErrorNode),
}

impl CstNode {
    pub fn span(&self) -> Span {
        match self {
            CstNode::Token(token) => token.span,
            CstNode::Node(node) => node.span,
            CstNode::Error(error) => error.span,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            CstNode::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            CstNode::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Node kind, if this is a non-terminal
    pub fn node_kind(&self) -> Option<NodeKind> {
        self.as_node().map(|n| n.kind)
    }

    /// Check if this element is a token with the given text
    pub fn is_token(&self, text: &str) -> bool {
        self.as_token().is_some_and(|t| t.text == text)
    }

    /// Child elements (empty for terminals)
    pub fn children(&self) -> &[CstNode] {
        match self {
            CstNode::Node(node) => &node.children,
            CstNode::Token(_) | CstNode::Error(_) => &[],
        }
    }

    /// All terminals under this element in source order
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![std::slice::from_ref(self).iter()],
            error: None,
        }
    }

    pub fn first_token(&self) -> Option<&Token> {
        self.tokens().next()
    }

    pub fn last_token(&self) -> Option<&Token> {
        match self {
            CstNode::Token(token) => Some(token),
            CstNode::Node(node) => node.children.iter().rev().find_map(CstNode::last_token),
            CstNode::Error(error) => error.tokens.last(),
        }
    }

    /// Leading trivia of this element (that of its first terminal)
    pub fn leading_trivia(&self) -> &[Trivia] {
        self.first_token().map_or(&[][..], |t| t.leading.as_slice())
    }

    /// Trailing trivia of this element (that of its last terminal)
    pub fn trailing_trivia(&self) -> &[Trivia] {
        self.last_token().map_or(&[][..], |t| t.trailing.as_slice())
    }

    /// Token texts concatenated without trivia
    pub fn compact_text(&self) -> String {
        self.tokens().map(|t| t.text.as_str()).collect()
    }

    /// Lossless reconstruction of the source covered by this element,
    /// trivia included
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for token in self.tokens() {
            out.push_str(&trivia_text(&token.leading));
            out.push_str(&token.text);
            out.push_str(&trivia_text(&token.trailing));
        }
        out
    }

    /// Check if any error node exists under this element
    pub fn has_errors(&self) -> bool {
        match self {
            CstNode::Error(_) => true,
            CstNode::Token(_) => false,
            CstNode::Node(node) => node.children.iter().any(CstNode::has_errors),
        }
    }

    /// Start of the first unparsed region under this element
    pub fn first_error_position(&self) -> Option<Position> {
        if let CstNode::Error(error) = self {
            return Some(error.span.start);
        }
        self.descendants()
            .into_iter()
            .flat_map(|node| node.children.iter())
            .find_map(|child| match child {
                CstNode::Error(error) => Some(error.span.start),
                _ => None,
            })
    }

    /// Pre-order traversal of non-terminals with their ancestor path
    ///
    /// `visit` receives each node and the chain of its ancestors, root first.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Node, &[&'a Node]),
    {
        fn go<'a, F>(element: &'a CstNode, path: &mut Vec<&'a Node>, visit: &mut F)
        where
            F: FnMut(&'a Node, &[&'a Node]),
        {
            if let CstNode::Node(node) = element {
                visit(node, path);
                path.push(node);
                for child in &node.children {
                    go(child, path, visit);
                }
                path.pop();
            }
        }

        let mut path = Vec::new();
        go(self, &mut path, visit);
    }

    /// All non-terminals under this element (itself included) in pre-order
    pub fn descendants(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        self.walk(&mut |node, _| nodes.push(node));
        nodes
    }
}

/// Depth-first terminal iterator
pub struct Tokens<'a> {
    stack: Vec<std::slice::Iter<'a, CstNode>>,
    error: Option<std::slice::Iter<'a, Token>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(iter) = self.error.as_mut() {
                if let Some(token) = iter.next() {
                    return Some(token);
                }
                self.error = None;
            }
            let top = self.stack.last_mut()?;
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(CstNode::Token(token)) => return Some(token),
                Some(CstNode::Node(node)) => self.stack.push(node.children.iter()),
                Some(CstNode::Error(error)) => self.error = Some(error.tokens.iter()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, line: usize, column: usize) -> CstNode {
        let start = Position::new(line, column);
        CstNode::Token(Token {
            kind: TokenKind::Identifier,
            text: text.to_string(),
            span: Span::new(start, start.advance(text)),
            leading: Vec::new(),
            trailing: Vec::new(),
        })
    }

    #[test]
    fn test_node_span_covers_children() {
        let node = Node::new(
            NodeKind::QualifiedName,
            vec![token("a", 1, 1), token("b", 2, 3)],
        );
        assert_eq!(node.span.start, Position::new(1, 1));
        assert_eq!(node.span.end, Position::new(2, 4));
        assert_eq!(node.span.lines(), 1..=2);
    }

    #[test]
    fn test_tokens_iterate_in_order() {
        let inner = CstNode::Node(Node::new(NodeKind::Type, vec![token("b", 1, 2)]));
        let root = CstNode::Node(Node::new(
            NodeKind::QualifiedName,
            vec![token("a", 1, 1), inner, token("c", 1, 3)],
        ));
        let texts: Vec<_> = root.tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
        assert_eq!(root.last_token().map(|t| t.text.as_str()), Some("c"));
        assert_eq!(root.compact_text(), "abc");
    }

    #[test]
    fn test_walk_provides_ancestor_path() {
        let inner = CstNode::Node(Node::new(NodeKind::Type, vec![token("b", 1, 2)]));
        let root = CstNode::Node(Node::new(NodeKind::QualifiedName, vec![inner]));

        let mut seen = Vec::new();
        root.walk(&mut |node, path| {
            seen.push((node.kind, path.iter().map(|n| n.kind).collect::<Vec<_>>()));
        });
        assert_eq!(
            seen,
            vec![
                (NodeKind::QualifiedName, vec![]),
                (NodeKind::Type, vec![NodeKind::QualifiedName]),
            ]
        );
    }

    #[test]
    fn test_position_advance() {
        let pos = Position::new(1, 1).advance("ab\ncd");
        assert_eq!(pos, Position::new(2, 3));
    }
}
