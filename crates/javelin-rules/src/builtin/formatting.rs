//! Line length rule

use crate::context::LintContext;
use crate::engine::{Rule, RuleCategory, RuleMetadata};
use javelin_core::cst::CstNode;
use javelin_core::{Diagnostic, Severity, SourceFile};

/// Rule ID for overlong lines
pub const LINE_LENGTH: &str = "STYLE-FORMAT-01";

/// Lines longer than the configured maximum
///
/// Length counts characters, not bytes. The diagnostic points at the first
/// character past the limit.
pub struct LineLength;

static LINE_LENGTH_METADATA: RuleMetadata = RuleMetadata {
    id: LINE_LENGTH,
    name: "line-length",
    description: "Lines do not exceed the configured maximum length",
    default_severity: Severity::Warning,
    category: RuleCategory::Style,
    docs_url: rule_docs!("style-format-01"),
    example: None,
};

impl Rule for LineLength {
    fn metadata(&self) -> &RuleMetadata {
        &LINE_LENGTH_METADATA
    }

    fn check(&self, _root: &CstNode, source: &SourceFile, ctx: &LintContext) -> Vec<Diagnostic> {
        let max = ctx.max_line_length;
        source
            .text
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                let length = line.chars().count();
                (length > max).then(|| {
                    LINE_LENGTH_METADATA
                        .diagnostic(
                            source,
                            index + 1,
                            max + 1,
                            format!("Line is {length} characters long, maximum is {max}"),
                        )
                        .with_details("Break the line or run `javelin format`")
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::test_support::{lines, run};

    #[test]
    fn test_reports_lines_over_the_limit() {
        let source = "class A {\n    int abcdefghij = 1;\n    int x = 1;\n}\n";
        let ctx = LintContext::default().with_max_line_length(20);
        let found = run(&LineLength, source, &ctx);
        assert_eq!(lines(&found), vec![2]);
        assert_eq!(found[0].location.column, 21);
        assert_eq!(found[0].message, "Line is 23 characters long, maximum is 20");
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let source = "class A {\n    int abcdefghi = 1;\n}\n";
        let ctx = LintContext::default().with_max_line_length(22);
        assert!(run(&LineLength, source, &ctx).is_empty());
    }

    #[test]
    fn test_counts_characters() {
        let source = "class A {\n    String s = \"ééééé\";\n}\n";
        let ctx = LintContext::default().with_max_line_length(23);
        assert!(run(&LineLength, source, &ctx).is_empty());
    }
}
