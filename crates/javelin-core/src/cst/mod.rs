//! Concrete Syntax Tree (CST) for Java sources
//!
//! The CST is lossless: every token keeps its source text and the
//! whitespace/comments around it, so the original file can be rebuilt
//! byte for byte. Both the formatter and the rule engine work on it.
//!
//! ## Trivia Handling
//!
//! Trivia is attached to tokens:
//! - **Leading trivia**: everything between the previous token's trailing
//!   trivia and this token
//! - **Trailing trivia**: the same-line run after a token, when that run ends
//!   at a line break (a trailing `// comment`, for instance)
//!
//! This enables lossless representation: `parse(source).root.to_source() == source`
//!
//! ## Example
//!
//! ```rust
//! use javelin_core::cst::{NodeKind, parse};
//!
//! let source = "class Greeter { void hi() {} } // done\n";
//! let parse = parse(source);
//! assert!(parse.is_ok());
//! assert_eq!(parse.root.to_source(), source);
//!
//! let methods = parse
//!     .root
//!     .descendants()
//!     .into_iter()
//!     .filter(|n| n.kind == NodeKind::MethodDeclaration)
//!     .count();
//! assert_eq!(methods, 1);
//! ```

mod lexer;
mod parser;
mod syntax_kind;
mod tree;

pub mod trivia;

pub use lexer::{KEYWORDS, LexError, LexResult, RawToken, is_keyword, lex};
pub use parser::{Parse, ParseError, attach_trivia, parse};
pub use syntax_kind::{NodeKind, TokenKind};
pub use tree::{CstNode, ErrorNode, Node, Position, Span, Token, Tokens};
pub use trivia::Trivia;
