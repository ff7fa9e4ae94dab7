//! Token and node kinds for the Javelin CST
//!
//! Both sets are closed: the grammar fixes them, and every consumer
//! (printer handlers, rules) matches on them exhaustively.

use serde::Serialize;

/// Kind of a terminal produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    LineComment,
    BlockComment,

    // Words and literals
    Identifier,
    Keyword,
    IntegerLiteral,
    FloatingLiteral,
    CharLiteral,
    StringLiteral,
    TextBlock,

    // Separators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    ColonColon,
    Colon,
    Question,
    Arrow,
    Lt,
    Gt,

    /// Every other operator (`=`, `==`, `&&`, `+=`, `<<`, ...)
    Operator,

    /// A character the lexer could not classify
    Unknown,

    /// End of input; carries end-of-file trivia
    Eof,
}

impl TokenKind {
    /// Whether this kind is trivia (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Whether this kind is a literal value
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatingLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::TextBlock
        )
    }
}

/// Kind of a non-terminal (grammar rule tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,
    QualifiedName,

    // Type declarations
    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    RecordDeclaration,
    AnnotationTypeDeclaration,

    // Modifiers and annotations
    Modifiers,
    Annotation,
    AnnotationArguments,
    ElementValuePair,
    ElementValueArray,

    // Types
    TypeParameters,
    TypeParameter,
    TypeArguments,
    Type,
    WildcardType,
    ExtendsClause,
    ImplementsClause,
    PermitsClause,
    ThrowsClause,

    // Bodies and members
    ClassBody,
    EnumBody,
    EnumConstant,
    RecordHeader,
    FieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    Initializer,
    EmptyDeclaration,
    DefaultValue,
    FormalParameters,
    FormalParameter,
    VariableDeclarator,

    // Statements
    Block,
    LocalVariableDeclaration,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    ForStatement,
    ForInit,
    ForUpdate,
    EnhancedForStatement,
    WhileStatement,
    DoStatement,
    TryStatement,
    ResourceSpecification,
    Resource,
    CatchClause,
    CatchParameter,
    FinallyClause,
    SwitchStatement,
    SwitchBlock,
    SwitchRule,
    SwitchGroup,
    SwitchLabel,
    Guard,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    YieldStatement,
    LabeledStatement,
    SynchronizedStatement,
    AssertStatement,
    EmptyStatement,

    // Expressions
    Assignment,
    Lambda,
    LambdaParameters,
    ConditionalExpression,
    BinaryExpression,
    InstanceofExpression,
    UnaryExpression,
    CastExpression,
    PostfixExpression,
    ParenthesizedExpression,
    ObjectCreation,
    ArrayCreation,
    ArrayInitializer,
    SwitchExpression,
    Arguments,
    MemberSelect,
    MethodCall,
    Invocation,
    ArrayAccess,
    MethodReference,
    PostIncrement,
    TypePattern,
    RecordPattern,
}

impl NodeKind {
    /// Type declarations (class-like)
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::ClassDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::EnumDeclaration
                | NodeKind::RecordDeclaration
                | NodeKind::AnnotationTypeDeclaration
        )
    }

    /// Declarations an annotation can decorate
    pub fn is_declaration(self) -> bool {
        self.is_type_declaration()
            || matches!(
                self,
                NodeKind::FieldDeclaration
                    | NodeKind::MethodDeclaration
                    | NodeKind::ConstructorDeclaration
                    | NodeKind::LocalVariableDeclaration
                    | NodeKind::FormalParameter
                    | NodeKind::EnumConstant
                    | NodeKind::PackageDeclaration
            )
    }

    /// Statement kinds
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::LocalVariableDeclaration
                | NodeKind::ExpressionStatement
                | NodeKind::IfStatement
                | NodeKind::ForStatement
                | NodeKind::EnhancedForStatement
                | NodeKind::WhileStatement
                | NodeKind::DoStatement
                | NodeKind::TryStatement
                | NodeKind::SwitchStatement
                | NodeKind::ReturnStatement
                | NodeKind::ThrowStatement
                | NodeKind::BreakStatement
                | NodeKind::ContinueStatement
                | NodeKind::YieldStatement
                | NodeKind::LabeledStatement
                | NodeKind::SynchronizedStatement
                | NodeKind::AssertStatement
                | NodeKind::EmptyStatement
        )
    }
}
