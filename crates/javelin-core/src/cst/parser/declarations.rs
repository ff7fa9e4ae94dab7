//! Type declarations, members, modifiers and annotations

use super::{Parser, node};
use crate::cst::syntax_kind::{NodeKind, TokenKind};
use crate::cst::tree::{CstNode, Span, Token};

impl Parser {
    /// Modifier list (keywords and annotations), if any
    pub(super) fn modifiers(&mut self) -> Option<CstNode> {
        let mut children = Vec::new();
        loop {
            if self.at("@") && !self.nth_at(1, "interface") {
                children.push(self.annotation());
            } else if self.at_non_sealed() {
                children.push(self.bump_non_sealed());
            } else if self.at_modifier() {
                children.push(self.bump());
            } else {
                break;
            }
        }
        (!children.is_empty()).then(|| node(NodeKind::Modifiers, children))
    }

    fn bump_non_sealed(&mut self) -> CstNode {
        let first = self.current().clone();
        let last = self.nth_token(2).clone();
        self.pos += 3;
        CstNode::Token(Token {
            kind: TokenKind::Keyword,
            text: "non-sealed".to_string(),
            span: Span::new(first.span.start, last.span.end),
            leading: first.leading,
            trailing: last.trailing,
        })
    }

    /// `@Name`, `@Name(value)`, `@Name(a = 1, b = {2, 3})`
    pub(super) fn annotation(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        children.push(self.qualified_name(false));
        if self.at("(") {
            let mut args = vec![self.bump()];
            while !self.at(")") && !self.at_eof() {
                if self.at_identifier() && self.nth_at(1, "=") {
                    let mut pair = vec![self.bump(), self.bump()];
                    pair.push(self.element_value());
                    args.push(node(NodeKind::ElementValuePair, pair));
                } else {
                    args.push(self.element_value());
                }
                if !self.eat(&mut args, ",") {
                    break;
                }
            }
            self.expect(&mut args, ")");
            children.push(node(NodeKind::AnnotationArguments, args));
        }
        node(NodeKind::Annotation, children)
    }

    fn element_value(&mut self) -> CstNode {
        if self.at("@") {
            self.annotation()
        } else if self.at("{") {
            let mut children = vec![self.bump()];
            while !self.at("}") && !self.at_eof() {
                children.push(self.element_value());
                if !self.eat(&mut children, ",") {
                    break;
                }
            }
            self.expect(&mut children, "}");
            node(NodeKind::ElementValueArray, children)
        } else {
            self.conditional()
        }
    }

    /// Top-level or member type declaration, `None` if the cursor is not at one
    pub(super) fn type_declaration_or_none(&mut self) -> Option<CstNode> {
        let start = self.pos;
        let modifiers = self.modifiers();
        if self.at_type_declaration_keyword() {
            return Some(self.type_declaration(modifiers));
        }
        // Not a declaration: rewind so the caller can report the token
        self.pos = start;
        None
    }

    fn at_type_declaration_keyword(&self) -> bool {
        self.at("class")
            || self.at("interface")
            || self.at("enum")
            || (self.at("@") && self.nth_at(1, "interface"))
            || self.at_record()
    }

    fn at_record(&self) -> bool {
        self.at("record")
            && self.nth_token(1).kind == TokenKind::Identifier
            && (self.nth_at(2, "(") || self.nth_at(2, "<"))
    }

    pub(super) fn type_declaration(&mut self, modifiers: Option<CstNode>) -> CstNode {
        let mut children: Vec<CstNode> = modifiers.into_iter().collect();

        let kind = if self.at("@") {
            children.push(self.bump());
            children.push(self.bump());
            NodeKind::AnnotationTypeDeclaration
        } else if self.at("interface") {
            children.push(self.bump());
            NodeKind::InterfaceDeclaration
        } else if self.at("enum") {
            children.push(self.bump());
            NodeKind::EnumDeclaration
        } else if self.at_record() {
            children.push(self.bump());
            NodeKind::RecordDeclaration
        } else {
            children.push(self.bump());
            NodeKind::ClassDeclaration
        };

        self.expect_identifier(&mut children);
        if self.at("<") {
            children.push(self.type_parameters());
        }
        if kind == NodeKind::RecordDeclaration {
            children.push(self.record_header());
        }

        loop {
            let clause = if self.at("extends") {
                NodeKind::ExtendsClause
            } else if self.at("implements") {
                NodeKind::ImplementsClause
            } else if self.at("permits") {
                NodeKind::PermitsClause
            } else {
                break;
            };
            let mut clause_children = vec![self.bump()];
            loop {
                clause_children.push(self.parse_type());
                if !self.eat(&mut clause_children, ",") {
                    break;
                }
            }
            children.push(node(clause, clause_children));
        }

        if kind == NodeKind::EnumDeclaration {
            children.push(self.enum_body());
        } else {
            children.push(self.class_body());
        }
        node(kind, children)
    }

    fn record_header(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "(");
        while !self.at(")") && !self.at_eof() {
            children.push(self.formal_parameter());
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        self.expect(&mut children, ")");
        node(NodeKind::RecordHeader, children)
    }

    pub(super) fn class_body(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "{");
        self.members_until_brace(&mut children);
        self.expect(&mut children, "}");
        node(NodeKind::ClassBody, children)
    }

    fn members_until_brace(&mut self, children: &mut Vec<CstNode>) {
        while !self.at("}") && !self.at_eof() {
            let before = self.pos;
            children.push(self.member());
            if self.pos == before {
                let message = format!("unexpected {} in type body", self.describe_current());
                children.push(self.error_token(message));
            }
        }
    }

    fn enum_body(&mut self) -> CstNode {
        let mut children = Vec::new();
        self.expect(&mut children, "{");
        while !self.at(";") && !self.at("}") && !self.at_eof() {
            let mut constant: Vec<CstNode> = self.modifiers().into_iter().collect();
            self.expect_identifier(&mut constant);
            if self.at("(") {
                constant.push(self.arguments());
            }
            if self.at("{") {
                constant.push(self.class_body());
            }
            children.push(node(NodeKind::EnumConstant, constant));
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        if self.eat(&mut children, ";") {
            self.members_until_brace(&mut children);
        }
        self.expect(&mut children, "}");
        node(NodeKind::EnumBody, children)
    }

    /// A class-body member
    fn member(&mut self) -> CstNode {
        if self.at(";") {
            return node(NodeKind::EmptyDeclaration, vec![self.bump()]);
        }

        let modifiers = self.modifiers();
        if self.at("{") {
            let mut children: Vec<CstNode> = modifiers.into_iter().collect();
            children.push(self.block());
            return node(NodeKind::Initializer, children);
        }
        if self.at_type_declaration_keyword() {
            return self.type_declaration(modifiers);
        }

        let mut children: Vec<CstNode> = modifiers.into_iter().collect();
        if self.at("<") {
            children.push(self.type_parameters());
        }

        // Constructor (`Name(`) or compact record constructor (`Name {`)
        if self.at_identifier() && (self.nth_at(1, "(") || self.nth_at(1, "{")) {
            children.push(self.bump());
            if self.at("(") {
                children.push(self.formal_parameters());
            }
            self.throws_clause(&mut children);
            children.push(self.block());
            return node(NodeKind::ConstructorDeclaration, children);
        }

        if self.skip_type(self.pos).is_none() {
            let message = format!("expected member declaration, found {}", self.describe_current());
            children.push(self.error_token(message));
            return node(NodeKind::FieldDeclaration, children);
        }
        children.push(self.parse_type());

        if self.at_identifier() && self.nth_at(1, "(") {
            children.push(self.bump());
            children.push(self.formal_parameters());
            self.dims(&mut children);
            self.throws_clause(&mut children);
            if self.at("default") {
                let mut default = vec![self.bump()];
                default.push(self.element_value());
                children.push(node(NodeKind::DefaultValue, default));
            }
            if self.at("{") {
                children.push(self.block());
            } else {
                self.expect(&mut children, ";");
            }
            return node(NodeKind::MethodDeclaration, children);
        }

        self.variable_declarators(&mut children);
        self.expect(&mut children, ";");
        node(NodeKind::FieldDeclaration, children)
    }

    fn throws_clause(&mut self, children: &mut Vec<CstNode>) {
        if self.at("throws") {
            let mut clause = vec![self.bump()];
            loop {
                clause.push(self.parse_type());
                if !self.eat(&mut clause, ",") {
                    break;
                }
            }
            children.push(node(NodeKind::ThrowsClause, clause));
        }
    }

    /// `a = 1, b[] = {2}, c`
    pub(super) fn variable_declarators(&mut self, children: &mut Vec<CstNode>) {
        loop {
            let mut declarator = Vec::new();
            self.expect_identifier(&mut declarator);
            self.dims(&mut declarator);
            if self.eat(&mut declarator, "=") {
                declarator.push(self.variable_initializer());
            }
            children.push(node(NodeKind::VariableDeclarator, declarator));
            if !self.eat(children, ",") {
                break;
            }
        }
    }

    pub(super) fn variable_initializer(&mut self) -> CstNode {
        if self.at("{") {
            self.array_initializer()
        } else {
            self.expression()
        }
    }

    pub(super) fn formal_parameters(&mut self) -> CstNode {
        let mut children = vec![self.bump()];
        while !self.at(")") && !self.at_eof() {
            children.push(self.formal_parameter());
            if !self.eat(&mut children, ",") {
                break;
            }
        }
        self.expect(&mut children, ")");
        node(NodeKind::FormalParameters, children)
    }

    /// `final @A Type... name[]`
    pub(super) fn formal_parameter(&mut self) -> CstNode {
        let mut children: Vec<CstNode> = self.modifiers().into_iter().collect();
        children.push(self.parse_type());
        self.eat(&mut children, "...");
        if self.at("this") {
            children.push(self.bump());
        } else {
            self.expect_identifier(&mut children);
        }
        self.dims(&mut children);
        node(NodeKind::FormalParameter, children)
    }
}
