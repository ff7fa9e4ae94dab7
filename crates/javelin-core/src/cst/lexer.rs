//! Trivia-preserving lexer
//!
//! Every byte of the input ends up in exactly one raw token, whitespace and
//! comments included, so the parser can rebuild the source losslessly.
//! `>` is always produced alone; the parser fuses adjacent closers into
//! shift operators where an expression needs them.

use super::syntax_kind::TokenKind;
use super::tree::Position;

/// Reserved words of the subject language
///
/// Contextual words (`var`, `record`, `yield`, `sealed`, `permits`, `when`)
/// are lexed as identifiers and recognised by the parser.
pub const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

/// Check if `word` is a reserved word
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

/// A token straight from the lexer, trivia not yet attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
}

/// Result returned by the lexer
pub type LexResult = (Vec<RawToken>, Vec<LexError>);

/// Lex input preserving all trivia
pub fn lex(input: &str) -> LexResult {
    let mut lexer = Lexer {
        input,
        offset: 0,
        position: Position::default(),
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    position: Position,
    tokens: Vec<RawToken>,
    errors: Vec<LexError>,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.offset..].chars().nth(n)
    }

    fn rest(&self) -> &str {
        &self.input[self.offset..]
    }

    fn run(&mut self) {
        while let Some(ch) = self.peek() {
            let start = self.offset;
            let kind = self.scan(ch);
            self.push(kind, start);
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let text = &self.input[start..self.offset];
        let token = RawToken {
            kind,
            text: text.to_string(),
            start: self.position,
        };
        self.position = self.position.advance(text);
        self.tokens.push(token);
    }

    /// Record an error at the start of the token being scanned
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(LexError {
            message: message.into(),
            position: self.position,
        });
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.offset += ch.len_utf8();
        }
    }

    /// Consume the longest of `candidates` that prefixes the rest (candidates
    /// are ordered longest first); returns whether one matched
    fn bump_any(&mut self, candidates: &[&str]) -> bool {
        for candidate in candidates {
            if self.rest().starts_with(candidate) {
                self.offset += candidate.len();
                return true;
            }
        }
        false
    }

    fn scan(&mut self, ch: char) -> TokenKind {
        let start = self.offset;
        match ch {
            c if c.is_whitespace() => {
                self.bump_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '/' if self.peek_at(1) == Some('/') => {
                self.bump_while(|c| c != '\n' && c != '\r');
                TokenKind::LineComment
            }
            '/' if self.peek_at(1) == Some('*') => {
                match self.input[start + 2..].find("*/") {
                    Some(end) => self.offset = start + 2 + end + 2,
                    None => {
                        self.error("unterminated block comment");
                        self.offset = self.input.len();
                    }
                }
                TokenKind::BlockComment
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                self.bump_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                if is_keyword(&self.input[start..self.offset]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            c if c.is_ascii_digit() => self.number(),
            '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
            '"' if self.rest().starts_with("\"\"\"") => {
                self.offset += 3;
                loop {
                    match self.peek() {
                        None => {
                            self.error("unterminated text block");
                            break;
                        }
                        Some('\\') => self.offset += 1 + self.peek_at(1).map_or(0, char::len_utf8),
                        Some('"') if self.rest().starts_with("\"\"\"") => {
                            self.offset += 3;
                            break;
                        }
                        Some(c) => self.offset += c.len_utf8(),
                    }
                }
                TokenKind::TextBlock
            }
            '"' | '\'' => {
                self.offset += 1;
                loop {
                    match self.peek() {
                        None | Some('\n') | Some('\r') => {
                            self.error("unterminated literal");
                            break;
                        }
                        Some('\\') => self.offset += 1 + self.peek_at(1).map_or(0, char::len_utf8),
                        Some(c) if c == ch => {
                            self.offset += 1;
                            break;
                        }
                        Some(c) => self.offset += c.len_utf8(),
                    }
                }
                if ch == '"' {
                    TokenKind::StringLiteral
                } else {
                    TokenKind::CharLiteral
                }
            }
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '@' => self.single(TokenKind::At),
            '?' => self.single(TokenKind::Question),
            '>' if !self.rest().starts_with(">=") => self.single(TokenKind::Gt),
            '.' => {
                if self.bump_any(&["..."]) {
                    TokenKind::Ellipsis
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            ':' => {
                if self.bump_any(&["::"]) {
                    TokenKind::ColonColon
                } else {
                    self.single(TokenKind::Colon)
                }
            }
            '-' if self.rest().starts_with("->") => {
                self.offset += 2;
                TokenKind::Arrow
            }
            '<' if !self.rest().starts_with("<<") && !self.rest().starts_with("<=") => {
                self.single(TokenKind::Lt)
            }
            _ => {
                let matched = self.bump_any(&[
                    "<<=", "<<", "<=", ">=", "==", "!=", "&&", "||", "++", "--", "+=", "-=", "*=",
                    "/=", "%=", "&=", "|=", "^=", "=", "!", "~", "+", "-", "*", "/", "%", "&",
                    "|", "^",
                ]);
                if matched {
                    TokenKind::Operator
                } else {
                    self.offset += ch.len_utf8();
                    self.error(format!("unexpected character '{ch}'"));
                    TokenKind::Unknown
                }
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.offset += 1;
        kind
    }

    fn number(&mut self) -> TokenKind {
        let mut floating = false;
        let radix_prefix = self.rest().len() > 1
            && self.rest().starts_with('0')
            && matches!(self.peek_at(1), Some('x' | 'X' | 'b' | 'B'));

        if radix_prefix {
            self.offset += 2;
            self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                floating = true;
                self.offset += 1;
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
                if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                    floating = true;
                    self.offset += 1 + sign;
                    self.bump_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
        }

        match self.peek() {
            Some('l' | 'L') => {
                self.offset += 1;
            }
            Some('f' | 'F' | 'd' | 'D') if !radix_prefix => {
                self.offset += 1;
                floating = true;
            }
            _ => {}
        }

        if floating {
            TokenKind::FloatingLiteral
        } else {
            TokenKind::IntegerLiteral
        }
    }
}
