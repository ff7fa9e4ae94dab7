//! Expressions, precedence climbing from assignment down to primaries

use super::{ASSIGNMENT_OPERATORS, PRIMITIVE_TYPES, Parser, node};
use crate::cst::syntax_kind::{NodeKind, TokenKind};
use crate::cst::tree::{CstNode, ErrorNode, Span};

const PREFIX_OPERATORS: &[&str] = &["+", "-", "++", "--", "!", "~"];

fn binary_precedence(op: &str) -> Option<u8> {
    let precedence = match op {
        "||" => 1,
        "&&" => 2,
        "|" => 3,
        "^" => 4,
        "&" => 5,
        "==" | "!=" => 6,
        "<" | ">" | "<=" | ">=" | "instanceof" => 7,
        "<<" | ">>" | ">>>" => 8,
        "+" | "-" => 9,
        "*" | "/" | "%" => 10,
        _ => return None,
    };
    Some(precedence)
}

impl Parser {
    pub(super) fn expression(&mut self) -> CstNode {
        if self.at_lambda() {
            return self.lambda();
        }
        let target = self.conditional();
        if let Some((text, count)) = self.assignment_operator() {
            let operator = if count > 1 {
                self.bump_fused(text, count)
            } else {
                self.bump()
            };
            let value = self.expression();
            return node(NodeKind::Assignment, vec![target, operator, value]);
        }
        target
    }

    fn assignment_operator(&self) -> Option<(String, usize)> {
        if let Some((text, count)) = self.fused_shift() {
            return text.ends_with('=').then_some((text, count));
        }
        let token = self.current();
        (token.kind == TokenKind::Operator && ASSIGNMENT_OPERATORS.contains(&token.text.as_str()))
            .then(|| (token.text.clone(), 1))
    }

    fn at_lambda(&self) -> bool {
        if self.at_identifier() {
            return self.nth_at(1, "->");
        }
        if self.at("(") {
            return self
                .skip_balanced(self.pos)
                .is_some_and(|after| self.is_word_at(after, "->"));
        }
        false
    }

    fn lambda(&mut self) -> CstNode {
        let mut children = Vec::new();
        if self.at_identifier() {
            children.push(self.bump());
        } else {
            let mut params = vec![self.bump()];
            while !self.at(")") && !self.at_eof() {
                let typed = self.at("final")
                    || self.at("@")
                    || self
                        .skip_type(self.pos)
                        .is_some_and(|after| self.token_at(after).kind == TokenKind::Identifier);
                if typed {
                    params.push(self.formal_parameter());
                } else {
                    self.expect_identifier(&mut params);
                }
                if !self.eat(&mut params, ",") {
                    break;
                }
            }
            self.expect(&mut params, ")");
            children.push(node(NodeKind::LambdaParameters, params));
        }
        self.expect(&mut children, "->");
        if self.at("{") {
            children.push(self.block());
        } else {
            children.push(self.expression());
        }
        node(NodeKind::Lambda, children)
    }

    /// `cond ? a : b`
    pub(super) fn conditional(&mut self) -> CstNode {
        let condition = self.binary(1);
        if !self.at("?") {
            return condition;
        }
        let mut children = vec![condition, self.bump()];
        children.push(self.expression());
        self.expect(&mut children, ":");
        if self.at_lambda() {
            children.push(self.lambda());
        } else {
            children.push(self.conditional());
        }
        node(NodeKind::ConditionalExpression, children)
    }

    fn binary(&mut self, min_precedence: u8) -> CstNode {
        let mut lhs = self.unary();
        loop {
            let (text, count) = match self.fused_shift() {
                Some(fused) => fused,
                None => (self.current().text.clone(), 1),
            };
            let is_operator = matches!(
                self.current().kind,
                TokenKind::Operator | TokenKind::Lt | TokenKind::Gt
            ) || self.at("instanceof");
            let Some(precedence) = binary_precedence(&text).filter(|_| is_operator) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }

            if text == "instanceof" {
                let mut children = vec![lhs, self.bump()];
                if self.at_pattern() {
                    children.push(self.pattern());
                } else {
                    children.push(self.parse_type());
                }
                lhs = node(NodeKind::InstanceofExpression, children);
                continue;
            }

            let operator = if count > 1 {
                self.bump_fused(text, count)
            } else {
                self.bump()
            };
            let rhs = self.binary(precedence + 1);
            lhs = node(NodeKind::BinaryExpression, vec![lhs, operator, rhs]);
        }
        lhs
    }

    fn unary(&mut self) -> CstNode {
        let token = self.current();
        if token.kind == TokenKind::Operator && PREFIX_OPERATORS.contains(&token.text.as_str()) {
            let operator = self.bump();
            let operand = self.unary();
            return node(NodeKind::UnaryExpression, vec![operator, operand]);
        }
        if self.at("(") && self.at_cast() {
            let mut children = vec![self.bump(), self.parse_type()];
            while self.eat(&mut children, "&") {
                children.push(self.parse_type());
            }
            self.expect(&mut children, ")");
            if self.at_lambda() {
                children.push(self.lambda());
            } else {
                children.push(self.unary());
            }
            return node(NodeKind::CastExpression, children);
        }
        self.postfix()
    }

    fn at_cast(&self) -> bool {
        let Some(mut after) = self.skip_type(self.pos + 1) else {
            return false;
        };
        while self.is_word_at(after, "&") {
            match self.skip_type(after + 1) {
                Some(next) => after = next,
                None => return false,
            }
        }
        if !self.is_word_at(after, ")") {
            return false;
        }

        let first = self.token_at(self.pos + 1);
        if first.kind == TokenKind::Keyword && PRIMITIVE_TYPES.contains(&first.text.as_str()) {
            return true;
        }
        let next = self.token_at(after + 1);
        match next.kind {
            TokenKind::Identifier | TokenKind::LParen => true,
            kind if kind.is_literal() => true,
            TokenKind::Keyword => matches!(
                next.text.as_str(),
                "this" | "super" | "new" | "true" | "false" | "null" | "switch"
            ),
            TokenKind::Operator => next.text == "!" || next.text == "~",
            _ => false,
        }
    }

    fn postfix(&mut self) -> CstNode {
        let primary = self.primary();
        let invocable = primary.as_token().is_some_and(|t| {
            t.kind == TokenKind::Identifier || t.text == "this" || t.text == "super"
        });

        let mut children = vec![primary];
        loop {
            if self.at(".") {
                let next = self.nth_token(1);
                let suffix = match next.kind {
                    TokenKind::Lt => {
                        let mut call = vec![self.bump(), self.type_arguments()];
                        self.expect_identifier(&mut call);
                        call.push(self.arguments());
                        node(NodeKind::MethodCall, call)
                    }
                    TokenKind::Identifier if self.nth_at(2, "(") => {
                        let call = vec![self.bump(), self.bump(), self.arguments()];
                        node(NodeKind::MethodCall, call)
                    }
                    TokenKind::Identifier => {
                        node(NodeKind::MemberSelect, vec![self.bump(), self.bump()])
                    }
                    TokenKind::Keyword if next.text == "new" => {
                        let dot = self.bump();
                        node(NodeKind::MemberSelect, vec![dot, self.creation()])
                    }
                    TokenKind::Keyword
                        if matches!(next.text.as_str(), "this" | "class" | "super") =>
                    {
                        node(NodeKind::MemberSelect, vec![self.bump(), self.bump()])
                    }
                    _ => break,
                };
                children.push(suffix);
            } else if self.at("(") && invocable && children.len() == 1 {
                let arguments = self.arguments();
                children.push(node(NodeKind::Invocation, vec![arguments]));
            } else if self.at("[") {
                let mut access = vec![self.bump()];
                if !self.at("]") {
                    access.push(self.expression());
                }
                self.expect(&mut access, "]");
                children.push(node(NodeKind::ArrayAccess, access));
            } else if self.at("::") {
                let mut reference = vec![self.bump()];
                if self.at("<") {
                    reference.push(self.type_arguments());
                }
                if self.at("new") {
                    reference.push(self.bump());
                } else {
                    self.expect_identifier(&mut reference);
                }
                children.push(node(NodeKind::MethodReference, reference));
            } else if self.at("++") || self.at("--") {
                children.push(node(NodeKind::PostIncrement, vec![self.bump()]));
            } else {
                break;
            }
        }

        if children.len() == 1 {
            children.remove(0)
        } else {
            node(NodeKind::PostfixExpression, children)
        }
    }

    fn primary(&mut self) -> CstNode {
        let kind = self.current().kind;
        let text = self.current().text.clone();
        match kind {
            TokenKind::Identifier => self.bump(),
            kind if kind.is_literal() => self.bump(),
            TokenKind::Keyword => match text.as_str() {
                "this" | "super" | "true" | "false" | "null" => self.bump(),
                "new" => self.creation(),
                "switch" => {
                    let mut children = vec![self.bump()];
                    children.push(self.paren_condition());
                    children.push(self.switch_block());
                    node(NodeKind::SwitchExpression, children)
                }
                text if PRIMITIVE_TYPES.contains(&text) => self.bump(),
                _ => self.missing_expression(),
            },
            TokenKind::LParen => {
                let mut children = vec![self.bump()];
                children.push(self.expression());
                self.expect(&mut children, ")");
                node(NodeKind::ParenthesizedExpression, children)
            }
            _ => self.missing_expression(),
        }
    }

    fn missing_expression(&mut self) -> CstNode {
        let message = format!("expected expression, found {}", self.describe_current());
        let token = self.current();
        let closes = matches!(
            token.kind,
            TokenKind::Semicolon
                | TokenKind::RParen
                | TokenKind::RBrace
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::Eof
        );
        if closes {
            let at = token.span.start;
            self.error(message);
            CstNode::Error(ErrorNode {
                tokens: Vec::new(),
                span: Span::new(at, at),
            })
        } else {
            self.error_token(message)
        }
    }

    /// `new Type(args) { body }` or `new Type[n][]` / `new Type[] {..}`
    fn creation(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        if self.at("<") {
            children.push(self.type_arguments());
        }
        children.push(self.parse_type_with_dims(false));

        if self.at("[") {
            while self.at("[") {
                children.push(self.bump());
                if !self.at("]") {
                    children.push(self.expression());
                }
                self.expect(&mut children, "]");
            }
            if self.at("{") {
                children.push(self.array_initializer());
            }
            return node(NodeKind::ArrayCreation, children);
        }

        if self.at("(") {
            children.push(self.arguments());
        } else {
            self.error(format!("expected '(', found {}", self.describe_current()));
        }
        if self.at("{") {
            children.push(self.class_body());
        }
        node(NodeKind::ObjectCreation, children)
    }

    pub(super) fn arguments(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "(");
        while !self.at(")") && !self.at_eof() {
            children.push(self.expression());
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        self.expect(&mut children, ")");
        node(NodeKind::Arguments, children)
    }

    pub(super) fn array_initializer(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        while !self.at("}") && !self.at_eof() {
            children.push(self.variable_initializer());
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        self.expect(&mut children, "}");
        node(NodeKind::ArrayInitializer, children)
    }
}
