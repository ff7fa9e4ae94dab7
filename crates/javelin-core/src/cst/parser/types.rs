//! Types, type arguments and type parameters, plus the lookahead used to
//! tell declarations from expressions

use super::{PRIMITIVE_TYPES, Parser, node};
use crate::cst::syntax_kind::{NodeKind, TokenKind};
use crate::cst::tree::CstNode;

impl Parser {
    /// `@A java.util.List<String>[]`
    pub(super) fn parse_type(&mut self) -> CstNode {
        self.parse_type_with_dims(true)
    }

    pub(super) fn parse_type_with_dims(&mut self, allow_dims: bool) -> CstNode {
        let mut children = Vec::new();
        while self.at("@") && !self.nth_at(1, "interface") {
            children.push(self.annotation());
        }

        if self.current().kind == TokenKind::Keyword
            && PRIMITIVE_TYPES.contains(&self.current().text.as_str())
        {
            children.push(self.bump());
        } else {
            self.expect_identifier(&mut children);
            if self.at("<") {
                children.push(self.type_arguments());
            }
            while self.at(".") && self.nth_token(1).kind == TokenKind::Identifier {
                children.push(self.bump());
                children.push(self.bump());
                if self.at("<") {
                    children.push(self.type_arguments());
                }
            }
        }

        if allow_dims {
            self.dims(&mut children);
        }
        node(NodeKind::Type, children)
    }

    /// Trailing `[]` pairs
    pub(super) fn dims(&mut self, children: &mut Vec<CstNode>) {
        while self.at("[") && self.nth_at(1, "]") {
            children.push(self.bump());
            children.push(self.bump());
        }
    }

    /// `<A, ? extends B>` (possibly the diamond `<>`)
    pub(super) fn type_arguments(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        while !self.at(">") && !self.at_eof() {
            if self.at("?") {
                let mut wildcard = vec![self.bump()];
                if self.at("extends") || self.at("super") {
                    wildcard.push(self.bump());
                    wildcard.push(self.parse_type());
                }
                children.push(node(NodeKind::WildcardType, wildcard));
            } else {
                children.push(self.parse_type());
            }
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        self.expect(&mut children, ">");
        node(NodeKind::TypeArguments, children)
    }

    /// `<T extends Comparable<T> & Serializable, U>`
    pub(super) fn type_parameters(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        loop {
            let mut param = Vec::new();
            while self.at("@") {
                param.push(self.annotation());
            }
            self.expect_identifier(&mut param);
            if self.eat(&mut param, "extends") {
                param.push(self.parse_type());
                while self.eat(&mut param, "&") {
                    param.push(self.parse_type());
                }
            }
            children.push(node(NodeKind::TypeParameter, param));
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        self.expect(&mut children, ">");
        node(NodeKind::TypeParameters, children)
    }

    /// Index just past a syntactically valid type starting at `idx`, if any
    pub(super) fn skip_type(&self, mut idx: usize) -> Option<usize> {
        while self.is_word_at(idx, "@") {
            idx = self.skip_annotation(idx)?;
        }

        let first = self.token_at(idx);
        if first.kind == TokenKind::Keyword && PRIMITIVE_TYPES.contains(&first.text.as_str()) {
            idx += 1;
        } else if first.kind == TokenKind::Identifier {
            idx += 1;
            if self.is_word_at(idx, "<") {
                idx = self.skip_type_arguments(idx)?;
            }
            while self.is_word_at(idx, ".")
                && self.token_at(idx + 1).kind == TokenKind::Identifier
            {
                idx += 2;
                if self.is_word_at(idx, "<") {
                    idx = self.skip_type_arguments(idx)?;
                }
            }
        } else {
            return None;
        }

        while self.is_word_at(idx, "[") && self.is_word_at(idx + 1, "]") {
            idx += 2;
        }
        Some(idx)
    }

    fn skip_type_arguments(&self, mut idx: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            let token = self.token_at(idx);
            match token.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx + 1);
                    }
                }
                TokenKind::Identifier
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Question
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::At => {}
                TokenKind::Keyword
                    if matches!(token.text.as_str(), "extends" | "super")
                        || PRIMITIVE_TYPES.contains(&token.text.as_str()) => {}
                TokenKind::Operator if token.text == "&" => {}
                _ => return None,
            }
            idx += 1;
        }
    }

    fn skip_annotation(&self, mut idx: usize) -> Option<usize> {
        idx += 1;
        if self.token_at(idx).kind != TokenKind::Identifier {
            return None;
        }
        idx += 1;
        while self.is_word_at(idx, ".") && self.token_at(idx + 1).kind == TokenKind::Identifier {
            idx += 2;
        }
        if self.is_word_at(idx, "(") {
            idx = self.skip_balanced(idx)?;
        }
        Some(idx)
    }

    /// Index just past the bracket group opening at `idx`
    pub(super) fn skip_balanced(&self, mut idx: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            let token = self.token_at(idx);
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(idx + 1);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            idx += 1;
        }
    }

    /// `Type name` followed by one of `terminators`, starting at the cursor
    /// (after any modifiers)
    pub(super) fn looks_like_declaration(&self, terminators: &[&str]) -> bool {
        let Some(after_type) = self.skip_type(self.pos) else {
            return false;
        };
        self.token_at(after_type).kind == TokenKind::Identifier
            && terminators
                .iter()
                .any(|t| self.is_word_at(after_type + 1, t))
    }
}
