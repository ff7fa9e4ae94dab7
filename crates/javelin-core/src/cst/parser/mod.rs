//! Recursive-descent parser producing the Javelin CST
//!
//! The parser works on significant tokens that already carry their trivia
//! (see [`attach_trivia`]). Every token ends up somewhere in the tree, so
//! `parse(source).root.to_source() == source` holds even for broken input.
//! Unparseable regions become [`ErrorNode`]s and a [`ParseError`] is recorded.

mod declarations;
mod expressions;
mod statements;
mod types;

use super::lexer::{LexError, RawToken, lex};
use super::syntax_kind::{NodeKind, TokenKind};
use super::tree::{CstNode, ErrorNode, Node, Position, Span, Token};
use super::trivia::Trivia;

/// A parse error with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            line: err.position.line,
            column: err.position.column,
            message: err.message,
        }
    }
}

/// Result of parsing a source file
#[derive(Debug, Clone)]
pub struct Parse {
    pub root: CstNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Earliest error in source order
    pub fn first_error(&self) -> Option<&ParseError> {
        self.errors.iter().min_by_key(|e| (e.line, e.column))
    }
}

/// Parse a compilation unit
pub fn parse(source: &str) -> Parse {
    let (raw, lex_errors) = lex(source);
    let tokens = attach_trivia(raw);
    let mut parser = Parser::new(tokens);
    let root = parser.compilation_unit();

    let mut errors: Vec<ParseError> = lex_errors.into_iter().map(ParseError::from).collect();
    errors.extend(parser.errors);
    tracing::trace!("Parsed {} bytes with {} error(s)", source.len(), errors.len());

    Parse { root, errors }
}

/// Turn raw lexer output into significant tokens carrying trivia
///
/// The trivia run following a token becomes its trailing trivia when it
/// stays on the token's line and ends at a line break (or end of input);
/// otherwise the run is leading trivia of the next token. A whitespace piece
/// containing the line break is split there: the part before the break
/// trails, the rest leads. The result always ends with an `Eof` token.
pub fn attach_trivia(raw: Vec<RawToken>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending: Vec<Trivia> = Vec::new();
    let mut end_of_input = Position::default();
    let mut iter = raw.into_iter().peekable();

    while let Some(raw) = iter.next() {
        end_of_input = raw.start.advance(&raw.text);
        if raw.kind.is_trivia() {
            pending.push(to_trivia(raw));
            continue;
        }

        let mut token = Token {
            kind: raw.kind,
            span: Span::new(raw.start, end_of_input),
            text: raw.text,
            leading: std::mem::take(&mut pending),
            trailing: Vec::new(),
        };

        // Same-line run after the token, up to and including the first
        // piece that breaks the line
        let mut run: Vec<RawToken> = Vec::new();
        while let Some(next) = iter.next_if(|next| next.kind.is_trivia()) {
            end_of_input = next.start.advance(&next.text);
            let breaks_line = next.text.contains('\n');
            run.push(next);
            if breaks_line {
                break;
            }
        }

        let terminated = match run.last() {
            Some(last) if last.text.contains('\n') => last.kind == TokenKind::Whitespace,
            _ => iter.peek().is_none(),
        };

        for piece in run {
            if !terminated {
                pending.push(to_trivia(piece));
            } else if piece.kind == TokenKind::Whitespace
                && let Some(split) = piece.text.find(['\n', '\r'])
            {
                let (before, after) = piece.text.split_at(split);
                if !before.is_empty() {
                    token.trailing.push(Trivia::Whitespace(before.to_string()));
                }
                pending.push(Trivia::Whitespace(after.to_string()));
            } else {
                token.trailing.push(to_trivia(piece));
            }
        }

        tokens.push(token);
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        span: Span::new(end_of_input, end_of_input),
        leading: pending,
        trailing: Vec::new(),
    });
    tokens
}

fn to_trivia(raw: RawToken) -> Trivia {
    match raw.kind {
        TokenKind::LineComment => Trivia::LineComment(raw.text),
        TokenKind::BlockComment => Trivia::BlockComment(raw.text),
        _ => Trivia::Whitespace(raw.text),
    }
}

/// Words that can appear in a modifier list
const MODIFIER_WORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "default",
    "sealed",
    "non-sealed",
];

pub(super) const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", ">>>=",
];

pub(super) const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    // ---- cursor -------------------------------------------------------

    fn nth_token(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn token_at(&self, idx: usize) -> &Token {
        &self.tokens[idx.min(self.tokens.len() - 1)]
    }

    fn current(&self) -> &Token {
        self.nth_token(0)
    }

    fn at(&self, text: &str) -> bool {
        self.is_word_at(self.pos, text)
    }

    fn nth_at(&self, n: usize, text: &str) -> bool {
        self.is_word_at(self.pos + n, text)
    }

    fn is_word_at(&self, idx: usize, text: &str) -> bool {
        let token = self.token_at(idx);
        token.text == text && !token.kind.is_literal()
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn at_eof(&self) -> bool {
        self.at_kind(TokenKind::Eof)
    }

    fn at_identifier(&self) -> bool {
        self.at_kind(TokenKind::Identifier)
    }

    fn bump(&mut self) -> CstNode {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        CstNode::Token(token)
    }

    /// Consume the current token if it has the given text
    fn eat(&mut self, children: &mut Vec<CstNode>, text: &str) -> bool {
        if self.at(text) {
            children.push(self.bump());
            true
        } else {
            false
        }
    }

    /// Consume an expected token, recording an error when it is missing
    fn expect(&mut self, children: &mut Vec<CstNode>, text: &str) {
        if !self.eat(children, text) {
            self.error(format!("expected '{text}', found {}", self.describe_current()));
        }
    }

    fn expect_identifier(&mut self, children: &mut Vec<CstNode>) {
        if self.at_identifier() {
            children.push(self.bump());
        } else {
            self.error(format!(
                "expected identifier, found {}",
                self.describe_current()
            ));
        }
    }

    fn describe_current(&self) -> String {
        match self.current().kind {
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("'{}'", self.current().text),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let start = self.current().span.start;
        self.errors.push(ParseError {
            line: start.line,
            column: start.column,
            message: message.into(),
        });
    }

    /// Wrap the current token in an error node and move past it
    fn error_token(&mut self, message: impl Into<String>) -> CstNode {
        self.error(message);
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        CstNode::Error(ErrorNode {
            span: token.span,
            tokens: vec![token],
        })
    }

    /// Fuse adjacent `>` tokens into a shift operator; returns the fused
    /// text and the number of tokens it spans
    fn fused_shift(&self) -> Option<(String, usize)> {
        if !self.at_kind(TokenKind::Gt) {
            return None;
        }
        let mut text = String::from(">");
        let mut count = 1;
        while count < 3 {
            let prev = self.nth_token(count - 1);
            let next = self.nth_token(count);
            let adjacent = prev.trailing.is_empty()
                && next.leading.is_empty()
                && prev.span.end == next.span.start;
            if !adjacent {
                break;
            }
            match next.kind {
                TokenKind::Gt => {
                    text.push('>');
                    count += 1;
                }
                TokenKind::Operator if next.text == ">=" => {
                    text.push_str(">=");
                    count += 1;
                    break;
                }
                _ => break,
            }
        }
        (count > 1).then_some((text, count))
    }

    /// Merge the next `count` tokens into one operator token
    fn bump_fused(&mut self, text: String, count: usize) -> CstNode {
        let first = self.current().clone();
        let last = self.nth_token(count - 1).clone();
        self.pos += count;
        CstNode::Token(Token {
            kind: TokenKind::Operator,
            text,
            span: Span::new(first.span.start, last.span.end),
            leading: first.leading,
            trailing: last.trailing,
        })
    }

    fn at_modifier(&self) -> bool {
        let token = self.current();
        if token.kind == TokenKind::Keyword {
            return MODIFIER_WORDS.contains(&token.text.as_str())
                && !(token.text == "default" && (self.nth_at(1, ":") || self.nth_at(1, "->")))
                && !(token.text == "synchronized" && self.nth_at(1, "("));
        }
        token.kind == TokenKind::Identifier
            && ((token.text == "sealed" && self.word_follows(1)) || self.at_non_sealed())
    }

    fn at_non_sealed(&self) -> bool {
        self.at("non")
            && self.nth_at(1, "-")
            && self.nth_at(2, "sealed")
            && self.nth_token(0).span.end == self.nth_token(1).span.start
            && self.nth_token(1).span.end == self.nth_token(2).span.start
    }

    fn word_follows(&self, n: usize) -> bool {
        matches!(
            self.nth_token(n).kind,
            TokenKind::Keyword | TokenKind::Identifier
        )
    }

    // ---- compilation unit ---------------------------------------------

    fn compilation_unit(&mut self) -> CstNode {
        let mut children = Vec::new();

        if self.at("package") {
            children.push(self.package_declaration());
        }
        loop {
            if self.at("import") {
                children.push(self.import_declaration());
            } else if self.at(";") {
                children.push(node(NodeKind::EmptyDeclaration, vec![self.bump()]));
            } else {
                break;
            }
        }
        while !self.at_eof() {
            if self.at(";") {
                children.push(node(NodeKind::EmptyDeclaration, vec![self.bump()]));
                continue;
            }
            match self.type_declaration_or_none() {
                Some(decl) => children.push(decl),
                None => {
                    let message = format!(
                        "expected type declaration, found {}",
                        self.describe_current()
                    );
                    children.push(self.error_token(message));
                }
            }
        }
        children.push(self.bump());
        node(NodeKind::CompilationUnit, children)
    }

    fn package_declaration(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        children.push(self.qualified_name(false));
        self.expect(&mut children, ";");
        node(NodeKind::PackageDeclaration, children)
    }

    fn import_declaration(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        self.eat(&mut children, "static");
        children.push(self.qualified_name(true));
        self.expect(&mut children, ";");
        node(NodeKind::ImportDeclaration, children)
    }

    /// `a.b.c`, optionally ending in `.*`
    fn qualified_name(&mut self, allow_star: bool) -> CstNode {
        let mut children = Vec::new();
        self.expect_identifier(&mut children);
        while self.at(".") {
            if self.nth_token(1).kind == TokenKind::Identifier {
                children.push(self.bump());
                children.push(self.bump());
            } else if allow_star && self.nth_at(1, "*") {
                children.push(self.bump());
                children.push(self.bump());
                break;
            } else {
                break;
            }
        }
        node(NodeKind::QualifiedName, children)
    }
}

pub(super) fn node(kind: NodeKind, children: Vec<CstNode>) -> CstNode {
    CstNode::Node(Node::new(kind, children))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(parse: &Parse) -> Vec<NodeKind> {
        parse.root.descendants().iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_trailing_comment_attaches_to_previous_token() {
        let tokens = attach_trivia(lex("int x; // note\nint y;").0);
        let semi = tokens.iter().find(|t| t.text == ";").unwrap();
        assert_eq!(
            semi.trailing,
            vec![
                Trivia::Whitespace(" ".to_string()),
                Trivia::LineComment("// note".to_string())
            ]
        );
        let second_int = tokens.iter().filter(|t| t.text == "int").nth(1).unwrap();
        assert_eq!(second_int.leading, vec![Trivia::Whitespace("\n".to_string())]);
    }

    #[test]
    fn test_comment_before_token_on_same_line_leads() {
        let tokens = attach_trivia(lex("a /* x */ b").0);
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!(b.leading.len(), 3);
        assert!(tokens[0].trailing.is_empty());
    }

    #[test]
    fn test_eof_carries_trailing_file_comments() {
        let tokens = attach_trivia(lex("class A {}\n// end\n").0);
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert!(eof.leading.iter().any(|t| t.is_comment()));
    }

    #[test]
    fn test_parse_is_lossless() {
        let source = "package a.b;\n\nimport java.util.*;\n\n/** Doc */\npublic class A<T> extends B implements C, D {\n    private final int x = 1; // one\n\n    public A() { super(); }\n}\n";
        let parse = parse(source);
        assert!(parse.is_ok(), "{:?}", parse.errors);
        assert_eq!(parse.root.to_source(), source);
    }

    #[test]
    fn test_parse_error_location() {
        let parse = parse("class A {\n    int x = ;\n}\n");
        let err = parse.first_error().unwrap();
        assert_eq!((err.line, err.column), (2, 13));
        assert_eq!(parse.root.to_source(), "class A {\n    int x = ;\n}\n");
    }

    #[test]
    fn test_declaration_kinds() {
        let parse = parse(
            "enum E { A, B; void f() {} }\nrecord R(int a) {}\n@interface Ann { int v() default 1; }\ninterface I { default void g() {} }\n",
        );
        assert!(parse.is_ok(), "{:?}", parse.errors);
        let kinds = kinds_of(&parse);
        for expected in [
            NodeKind::EnumDeclaration,
            NodeKind::EnumConstant,
            NodeKind::RecordDeclaration,
            NodeKind::RecordHeader,
            NodeKind::AnnotationTypeDeclaration,
            NodeKind::DefaultValue,
            NodeKind::InterfaceDeclaration,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?}");
        }
    }

    #[test]
    fn test_shift_operators_are_fused() {
        let parse = parse("class A { int f(int a) { return a >> 2 >>> 1; } }");
        assert!(parse.is_ok(), "{:?}", parse.errors);
        let ops: Vec<_> = parse
            .root
            .tokens()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.clone())
            .collect();
        assert_eq!(ops, [">>", ">>>"]);
    }

    #[test]
    fn test_nested_generics_close_separately() {
        let parse = parse("class A { Map<String, List<Integer>> m; }");
        assert!(parse.is_ok(), "{:?}", parse.errors);
        let closers = parse
            .root
            .tokens()
            .filter(|t| t.kind == TokenKind::Gt)
            .count();
        assert_eq!(closers, 2);
    }

    #[test]
    fn test_statements_and_expressions() {
        let source = r#"class A {
    void f(List<String> items) {
        for (int i = 0; i < 10; i++) { g(i); }
        for (String s : items) System.out.println(s);
        try (var in = open()) { read(in); } catch (IOException | RuntimeException e) { } finally { close(); }
        var r = switch (x) { case 1, 2 -> "a"; case Circle c when c.r() > 0 -> "b"; default -> { yield "c"; } };
        switch (y) { case A: f(); break; default: g(); }
        Runnable run = () -> System.out.println("hi");
        items.stream().map(s -> s.trim()).filter(String::isEmpty).count();
        int[] arr = new int[] {1, 2, 3};
        Object o = (Object) arr;
        boolean b = o instanceof String str && !str.isEmpty();
        label: while (true) { do { continue label; } while (false); }
        int t = a < b ? a : b;
        new Thread() { public void run() {} }.start();
        assert x > 0 : "positive";
        synchronized (this) { count++; }
    }
}
"#;
        let parse = parse(source);
        assert!(parse.is_ok(), "{:?}", parse.errors);
        assert_eq!(parse.root.to_source(), source);
        let kinds = kinds_of(&parse);
        for expected in [
            NodeKind::ForStatement,
            NodeKind::EnhancedForStatement,
            NodeKind::TryStatement,
            NodeKind::ResourceSpecification,
            NodeKind::CatchClause,
            NodeKind::SwitchExpression,
            NodeKind::SwitchRule,
            NodeKind::SwitchGroup,
            NodeKind::Guard,
            NodeKind::TypePattern,
            NodeKind::YieldStatement,
            NodeKind::Lambda,
            NodeKind::MethodReference,
            NodeKind::ArrayCreation,
            NodeKind::CastExpression,
            NodeKind::InstanceofExpression,
            NodeKind::LabeledStatement,
            NodeKind::DoStatement,
            NodeKind::ConditionalExpression,
            NodeKind::ObjectCreation,
            NodeKind::AssertStatement,
            NodeKind::SynchronizedStatement,
            NodeKind::PostIncrement,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?}");
        }
    }
}
