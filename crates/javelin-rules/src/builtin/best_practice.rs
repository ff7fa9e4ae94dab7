//! Best-practice rules: empty catch blocks, console streams, unbraced bodies

use crate::context::LintContext;
use crate::engine::{Rule, RuleCategory, RuleMetadata};
use javelin_core::cst::trivia::has_comments;
use javelin_core::cst::{CstNode, Node, NodeKind, Token, TokenKind};
use javelin_core::{Diagnostic, Severity, SourceFile};

/// Rule ID for empty catch blocks
pub const EMPTY_CATCH: &str = "BEST-PRACTICE-01";

/// Rule ID for `System.out` / `System.err` usage
pub const SYSTEM_STREAMS: &str = "BEST-PRACTICE-02";

/// Rule ID for control-flow bodies without braces
pub const MISSING_BRACES: &str = "BEST-PRACTICE-03";

fn keyword_diagnostic(
    metadata: &RuleMetadata,
    source: &SourceFile,
    keyword: &Token,
    message: impl Into<String>,
) -> Diagnostic {
    metadata.diagnostic(
        source,
        keyword.span.start.line,
        keyword.span.start.column,
        message,
    )
}

/// `catch` blocks with neither statements nor comments
pub struct EmptyCatch;

static EMPTY_CATCH_METADATA: RuleMetadata = RuleMetadata {
    id: EMPTY_CATCH,
    name: "empty-catch",
    description: "catch blocks handle, rethrow or at least explain the exception",
    default_severity: Severity::Error,
    category: RuleCategory::BestPractice,
    docs_url: rule_docs!("best-practice-01"),
    example: Some("catch (IOException e) {\n    throw new UncheckedIOException(e);\n}"),
};

/// A block holding only its braces, no comment between them
fn is_empty_block(block: &Node) -> bool {
    match block.children.as_slice() {
        [CstNode::Token(open), CstNode::Token(close)] => {
            !has_comments(&open.trailing) && !has_comments(&close.leading)
        }
        _ => false,
    }
}

impl Rule for EmptyCatch {
    fn metadata(&self) -> &RuleMetadata {
        &EMPTY_CATCH_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        root.descendants()
            .into_iter()
            .filter(|node| node.kind == NodeKind::CatchClause)
            .filter(|clause| clause.child_node(NodeKind::Block).is_some_and(is_empty_block))
            .filter_map(|clause| clause.child_tokens().next())
            .map(|keyword| {
                keyword_diagnostic(
                    &EMPTY_CATCH_METADATA,
                    source,
                    keyword,
                    "Empty catch block swallows the exception",
                )
                .with_details("Handle or rethrow the exception, or comment why it is ignored")
            })
            .collect()
    }
}

/// Direct use of `System.out` or `System.err`
pub struct SystemStreams;

static SYSTEM_STREAMS_METADATA: RuleMetadata = RuleMetadata {
    id: SYSTEM_STREAMS,
    name: "system-streams",
    description: "Output goes through a logger, not System.out or System.err",
    default_severity: Severity::Warning,
    category: RuleCategory::BestPractice,
    docs_url: rule_docs!("best-practice-02"),
    example: Some("log.info(\"Order placed: {}\", id);"),
};

/// `System` and the selected stream name, when `postfix` starts with one
fn system_stream(postfix: &Node) -> Option<(&Token, &str)> {
    let [CstNode::Token(receiver), CstNode::Node(select), ..] = postfix.children.as_slice() else {
        return None;
    };
    if receiver.kind != TokenKind::Identifier || !receiver.is("System") {
        return None;
    }
    if select.kind != NodeKind::MemberSelect {
        return None;
    }
    let stream = select.name_token()?;
    matches!(stream.text.as_str(), "out" | "err").then_some((receiver, stream.text.as_str()))
}

impl Rule for SystemStreams {
    fn metadata(&self) -> &RuleMetadata {
        &SYSTEM_STREAMS_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        root.descendants()
            .into_iter()
            .filter(|node| node.kind == NodeKind::PostfixExpression)
            .filter_map(system_stream)
            .map(|(receiver, stream)| {
                keyword_diagnostic(
                    &SYSTEM_STREAMS_METADATA,
                    source,
                    receiver,
                    format!("Use a logger instead of System.{stream}"),
                )
            })
            .collect()
    }
}

/// `if`/`else`/`for`/`while`/`do` bodies that are not blocks
///
/// `else if` chains are accepted.
pub struct MissingBraces;

static MISSING_BRACES_METADATA: RuleMetadata = RuleMetadata {
    id: MISSING_BRACES,
    name: "missing-braces",
    description: "Control-flow bodies are always blocks",
    default_severity: Severity::Warning,
    category: RuleCategory::BestPractice,
    docs_url: rule_docs!("best-practice-03"),
    example: Some("if (ready) {\n    start();\n}"),
};

/// Statement bodies of a control-flow node, each with its keyword
fn bodies(node: &Node) -> Vec<(&Token, &CstNode)> {
    let keyword = node.child_tokens().next();
    let body = match node.kind {
        // if (cond) stmt [else ...]
        NodeKind::IfStatement => node
            .children
            .iter()
            .skip_while(|c| c.node_kind() != Some(NodeKind::ParenthesizedExpression))
            .nth(1),
        // else stmt; `else if` is a chain, not a body
        NodeKind::ElseClause => node
            .children
            .get(1)
            .filter(|c| c.node_kind() != Some(NodeKind::IfStatement)),
        NodeKind::ForStatement | NodeKind::EnhancedForStatement | NodeKind::WhileStatement => {
            node.children.last()
        }
        // do stmt while (cond);
        NodeKind::DoStatement => node.children.get(1),
        _ => None,
    };
    keyword.zip(body).into_iter().collect()
}

impl Rule for MissingBraces {
    fn metadata(&self) -> &RuleMetadata {
        &MISSING_BRACES_METADATA
    }

    fn check(&self, root: &CstNode, source: &SourceFile, _ctx: &LintContext) -> Vec<Diagnostic> {
        root.descendants()
            .into_iter()
            .flat_map(bodies)
            .filter(|(_, body)| body.node_kind() != Some(NodeKind::Block))
            .map(|(keyword, _)| {
                keyword_diagnostic(
                    &MISSING_BRACES_METADATA,
                    source,
                    keyword,
                    format!("'{}' body should be enclosed in braces", keyword.text),
                )
            })
            .collect()
    }
}
