//! Blocks and statements

use super::{ASSIGNMENT_OPERATORS, Parser, node};
use crate::cst::syntax_kind::{NodeKind, TokenKind};
use crate::cst::tree::CstNode;

impl Parser {
    pub(super) fn block(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "{");
        while !self.at("}") && !self.at_eof() {
            let before = self.pos;
            children.push(self.block_statement());
            if self.pos == before {
                let message = format!("unexpected {} in block", self.describe_current());
                children.push(self.error_token(message));
            }
        }
        self.expect(&mut children, "}");
        node(NodeKind::Block, children)
    }

    /// A statement, local variable or local type declaration
    pub(super) fn block_statement(&mut self) -> CstNode {
        if self.at_kind(TokenKind::Identifier) && self.nth_at(1, ":") && !self.nth_at(1, "::") {
            let mut children = vec![self.bump(), self.bump()];
            children.push(self.statement());
            return node(NodeKind::LabeledStatement, children);
        }

        let start = self.pos;
        let modifiers = self.modifiers();
        if let Some(decl) = self.local_type_declaration(modifiers.clone()) {
            return decl;
        }
        if modifiers.is_some() || self.looks_like_declaration(&["=", ";", ",", "["]) {
            let mut children: Vec<CstNode> = modifiers.into_iter().collect();
            children.push(self.parse_type());
            self.variable_declarators(&mut children);
            self.expect(&mut children, ";");
            return node(NodeKind::LocalVariableDeclaration, children);
        }
        self.pos = start;
        self.statement()
    }

    fn local_type_declaration(&mut self, modifiers: Option<CstNode>) -> Option<CstNode> {
        let at_decl = self.at("class")
            || self.at("interface")
            || self.at("enum")
            || (self.at("record")
                && self.nth_token(1).kind == TokenKind::Identifier
                && (self.nth_at(2, "(") || self.nth_at(2, "<")));
        at_decl.then(|| self.type_declaration(modifiers))
    }

    pub(super) fn statement(&mut self) -> CstNode {
        let word = self.current().text.clone();
        let keyword = self.current().kind == TokenKind::Keyword;
        match word.as_str() {
            "{" => self.block(),
            ";" => node(NodeKind::EmptyStatement, vec![self.bump()]),
            "if" if keyword => self.if_statement(),
            "for" if keyword => self.for_statement(),
            "while" if keyword => {
                let mut children = vec![self.bump()];
                children.push(self.paren_condition());
                children.push(self.statement());
                node(NodeKind::WhileStatement, children)
            }
            "do" if keyword => {
                let mut children = vec![self.bump()];
                children.push(self.statement());
                self.expect(&mut children, "while");
                children.push(self.paren_condition());
                self.expect(&mut children, ";");
                node(NodeKind::DoStatement, children)
            }
            "try" if keyword => self.try_statement(),
            "switch" if keyword => {
                let mut children = vec![self.bump()];
                children.push(self.paren_condition());
                children.push(self.switch_block());
                node(NodeKind::SwitchStatement, children)
            }
            "return" if keyword => self.keyword_with_optional_expression(NodeKind::ReturnStatement),
            "throw" if keyword => self.keyword_with_optional_expression(NodeKind::ThrowStatement),
            "break" | "continue" if keyword => {
                let kind = if word == "break" {
                    NodeKind::BreakStatement
                } else {
                    NodeKind::ContinueStatement
                };
                let mut children = vec![self.bump()];
                if self.at_identifier() {
                    children.push(self.bump());
                }
                self.expect(&mut children, ";");
                node(kind, children)
            }
            "synchronized" if keyword => {
                let mut children = vec![self.bump()];
                children.push(self.paren_condition());
                children.push(self.block());
                node(NodeKind::SynchronizedStatement, children)
            }
            "assert" if keyword => {
                let mut children = vec![self.bump()];
                children.push(self.expression());
                if self.eat(&mut children, ":") {
                    children.push(self.expression());
                }
                self.expect(&mut children, ";");
                node(NodeKind::AssertStatement, children)
            }
            "yield" if self.at_yield_statement() => {
                self.keyword_with_optional_expression(NodeKind::YieldStatement)
            }
            _ => {
                let mut children = vec![self.expression()];
                self.expect(&mut children, ";");
                node(NodeKind::ExpressionStatement, children)
            }
        }
    }

    fn at_yield_statement(&self) -> bool {
        let next = self.nth_token(1);
        !(ASSIGNMENT_OPERATORS.contains(&next.text.as_str())
            || matches!(
                next.kind,
                TokenKind::Dot
                    | TokenKind::LBracket
                    | TokenKind::Arrow
                    | TokenKind::ColonColon
                    | TokenKind::Semicolon
            )
            || next.text == "++"
            || next.text == "--")
    }

    fn keyword_with_optional_expression(&mut self, kind: NodeKind) -> CstNode {
        let mut children = vec![self.bump()];
        if !self.at(";") {
            children.push(self.expression());
        }
        self.expect(&mut children, ";");
        node(kind, children)
    }

    /// `(expr)` after `if`, `while`, `switch`, `synchronized`
    pub(super) fn paren_condition(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "(");
        children.push(self.expression());
        self.expect(&mut children, ")");
        node(NodeKind::ParenthesizedExpression, children)
    }

    fn if_statement(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        children.push(self.paren_condition());
        children.push(self.statement());
        if self.at("else") {
            let mut else_children = vec![self.bump()];
            else_children.push(self.statement());
            children.push(node(NodeKind::ElseClause, else_children));
        }
        node(NodeKind::IfStatement, children)
    }

    fn for_statement(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        self.expect(&mut children, "(");

        let start = self.pos;
        let modifiers = self.modifiers();
        if modifiers.is_some() || self.looks_like_declaration(&[":"]) {
            let is_enhanced = {
                let after_type = self.skip_type(self.pos);
                after_type.is_some_and(|idx| self.is_word_at(idx + 1, ":"))
            };
            if is_enhanced {
                let mut variable: Vec<CstNode> = modifiers.into_iter().collect();
                variable.push(self.parse_type());
                self.expect_identifier(&mut variable);
                children.push(node(NodeKind::FormalParameter, variable));
                children.push(self.bump());
                children.push(self.expression());
                self.expect(&mut children, ")");
                children.push(self.statement());
                return node(NodeKind::EnhancedForStatement, children);
            }
        }
        self.pos = start;

        if !self.at(";") {
            let start = self.pos;
            let modifiers = self.modifiers();
            let init = if modifiers.is_some() || self.looks_like_declaration(&["=", ";", ","]) {
                let mut local: Vec<CstNode> = modifiers.into_iter().collect();
                local.push(self.parse_type());
                self.variable_declarators(&mut local);
                vec![node(NodeKind::LocalVariableDeclaration, local)]
            } else {
                self.pos = start;
                self.expression_list()
            };
            children.push(node(NodeKind::ForInit, init));
        }
        self.expect(&mut children, ";");
        if !self.at(";") {
            children.push(self.expression());
        }
        self.expect(&mut children, ";");
        if !self.at(")") {
            let update = self.expression_list();
            children.push(node(NodeKind::ForUpdate, update));
        }
        self.expect(&mut children, ")");
        children.push(self.statement());
        node(NodeKind::ForStatement, children)
    }

    fn expression_list(&mut self) -> Vec<CstNode> {
        let mut items = vec![self.expression()];
        while self.eat(&mut items, ",") {
            items.push(self.expression());
        }
        items
    }

    fn try_statement(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        if self.at("(") {
            let mut resources = vec![self.bump()];
            while !self.at(")") && !self.at_eof() {
                let start = self.pos;
                let modifiers = self.modifiers();
                let resource = if modifiers.is_some() || self.looks_like_declaration(&["="]) {
                    let mut local: Vec<CstNode> = modifiers.into_iter().collect();
                    local.push(self.parse_type());
                    self.expect_identifier(&mut local);
                    self.expect(&mut local, "=");
                    local.push(self.expression());
                    local
                } else {
                    self.pos = start;
                    vec![self.expression()]
                };
                resources.push(node(NodeKind::Resource, resource));
                if !self.eat(&mut resources, ";") {
                    break;
                }
            }
            self.expect(&mut resources, ")");
            children.push(node(NodeKind::ResourceSpecification, resources));
        }
        children.push(self.block());

        while self.at("catch") {
            let mut catch = vec![self.bump()];
            self.expect(&mut catch, "(");
            let mut parameter: Vec<CstNode> = self.modifiers().into_iter().collect();
            parameter.push(self.parse_type());
            while self.eat(&mut parameter, "|") {
                parameter.push(self.parse_type());
            }
            self.expect_identifier(&mut parameter);
            catch.push(node(NodeKind::CatchParameter, parameter));
            self.expect(&mut catch, ")");
            catch.push(self.block());
            children.push(node(NodeKind::CatchClause, catch));
        }
        if self.at("finally") {
            let mut finally = vec![self.bump()];
            finally.push(self.block());
            children.push(node(NodeKind::FinallyClause, finally));
        }
        node(NodeKind::TryStatement, children)
    }

    /// `{ case ... }` shared by switch statements and switch expressions
    pub(super) fn switch_block(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "{");
        while !self.at("}") && !self.at_eof() {
            if !self.at("case") && !self.at("default") {
                let message = format!("expected 'case' or 'default', found {}", self.describe_current());
                children.push(self.error_token(message));
                continue;
            }
            let label = self.switch_label();
            if self.at("->") {
                let mut rule = vec![label, self.bump()];
                if self.at("{") {
                    rule.push(self.block());
                } else if self.at("throw") {
                    rule.push(self.statement());
                } else {
                    let mut statement = vec![self.expression()];
                    self.expect(&mut statement, ";");
                    rule.push(node(NodeKind::ExpressionStatement, statement));
                }
                children.push(node(NodeKind::SwitchRule, rule));
            } else {
                let mut group = vec![label];
                self.expect(&mut group, ":");
                while self.at("case") || (self.at("default") && self.nth_at(1, ":")) {
                    group.push(self.switch_label());
                    self.expect(&mut group, ":");
                }
                while !self.at("case") && !self.at("default") && !self.at("}") && !self.at_eof()
                {
                    let before = self.pos;
                    group.push(self.block_statement());
                    if self.pos == before {
                        let message = format!("unexpected {} in switch", self.describe_current());
                        group.push(self.error_token(message));
                    }
                }
                children.push(node(NodeKind::SwitchGroup, group));
            }
        }
        self.expect(&mut children, "}");
        node(NodeKind::SwitchBlock, children)
    }

    /// `case A, B when cond` or `default`
    fn switch_label(&mut self) -> CstNode {
        let is_default = self.at("default");
        let mut children = vec![self.bump()];
        if is_default {
            return node(NodeKind::SwitchLabel, children);
        }
        loop {
            children.push(self.case_item());
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        if self.at("when") {
            let mut guard = vec![self.bump()];
            guard.push(self.conditional());
            children.push(node(NodeKind::Guard, guard));
        }
        node(NodeKind::SwitchLabel, children)
    }

    /// A case constant or pattern
    fn case_item(&mut self) -> CstNode {
        if self.at("default") {
            return self.bump();
        }
        if self.at_pattern() {
            return self.pattern();
        }
        self.conditional()
    }

    pub(super) fn at_pattern(&self) -> bool {
        if self.at("final") {
            return true;
        }
        match self.skip_type(self.pos) {
            Some(after) => {
                let next = self.token_at(after);
                next.kind == TokenKind::Identifier
                    || (next.kind == TokenKind::LParen
                        && self
                            .current()
                            .text
                            .chars()
                            .next()
                            .is_some_and(char::is_uppercase))
            }
            None => false,
        }
    }

    /// Type pattern (`String s`) or record pattern (`Point(int x, var y)`)
    pub(super) fn pattern(&mut self) -> CstNode {
        let mut children: Vec<CstNode> = self.modifiers().into_iter().collect();
        children.push(self.parse_type());
        if self.at("(") {
            children.push(self.bump());
            while !self.at(")") && !self.at_eof() {
                children.push(self.pattern());
                if !self.eat(&mut children, ",") {
                    break;
                }
            }
            self.expect(&mut children, ")");
            if self.at_identifier() {
                children.push(self.bump());
            }
            return node(NodeKind::RecordPattern, children);
        }
        self.expect_identifier(&mut children);
        node(NodeKind::TypePattern, children)
    }
}
