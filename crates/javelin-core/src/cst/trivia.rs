//! Trivia model for the Javelin CST
//!
//! Trivia is non-semantic source material (whitespace, comments). It is
//! stored on terminals only: each token owns the trivia run immediately
//! before it (*leading*) and the same-line run after it (*trailing*).
//! Composite nodes expose the trivia of their first and last token, so a
//! piece of trivia belongs to exactly one place in the tree.

use serde::Serialize;

/// A single piece of trivia
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Trivia {
    /// Raw whitespace, newlines included
    Whitespace(String),
    /// `// ...` up to (excluding) the line break
    LineComment(String),
    /// `/* ... */`, possibly spanning several lines
    BlockComment(String),
}

impl Trivia {
    /// Raw source text of this trivia
    pub fn text(&self) -> &str {
        match self {
            Trivia::Whitespace(text) | Trivia::LineComment(text) | Trivia::BlockComment(text) => {
                text
            }
        }
    }

    /// Check if this is a comment
    pub fn is_comment(&self) -> bool {
        matches!(self, Trivia::LineComment(_) | Trivia::BlockComment(_))
    }

    /// Check if this is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Trivia::Whitespace(_))
    }

    /// Number of line breaks inside this trivia
    pub fn newline_count(&self) -> usize {
        self.text().matches('\n').count()
    }

    /// Check if this is a javadoc-style block comment (`/** ... */`)
    pub fn is_doc_comment(&self) -> bool {
        matches!(self, Trivia::BlockComment(text) if text.starts_with("/**") && text != "/**/")
    }

    /// Get the comment content (without `//` or `/* */`)
    pub fn comment_content(&self) -> Option<&str> {
        match self {
            Trivia::LineComment(text) => Some(text.trim_start_matches("//").trim()),
            Trivia::BlockComment(text) => Some(
                text.trim_start_matches("/*")
                    .trim_end_matches("*/")
                    .trim(),
            ),
            Trivia::Whitespace(_) => None,
        }
    }
}

/// Total number of line breaks in a trivia run
pub fn newline_count(trivia: &[Trivia]) -> usize {
    trivia.iter().map(Trivia::newline_count).sum()
}

/// Check if a trivia run contains any comment
pub fn has_comments(trivia: &[Trivia]) -> bool {
    trivia.iter().any(Trivia::is_comment)
}

/// Check if the trivia run before a token contains a blank line
///
/// Only line breaks before the first comment count; blank lines between a
/// comment and its token are the comment printer's concern.
pub fn has_blank_line_before(trivia: &[Trivia]) -> bool {
    let mut breaks = 0;
    for piece in trivia {
        match piece {
            Trivia::Whitespace(text) => {
                breaks += text.matches('\n').count();
                if breaks >= 2 {
                    return true;
                }
            }
            // A line comment swallows its own line break; the next
            // whitespace starts counting from a fresh line.
            Trivia::LineComment(_) | Trivia::BlockComment(_) => return false,
        }
    }
    false
}

/// Concatenate raw trivia text
pub fn trivia_text(trivia: &[Trivia]) -> String {
    trivia.iter().map(Trivia::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_content() {
        let line = Trivia::LineComment("// hello".to_string());
        assert_eq!(line.comment_content(), Some("hello"));

        let block = Trivia::BlockComment("/* note */".to_string());
        assert_eq!(block.comment_content(), Some("note"));

        let ws = Trivia::Whitespace("  ".to_string());
        assert_eq!(ws.comment_content(), None);
    }

    #[test]
    fn test_doc_comment_detection() {
        assert!(Trivia::BlockComment("/** Docs */".to_string()).is_doc_comment());
        assert!(!Trivia::BlockComment("/* plain */".to_string()).is_doc_comment());
        assert!(!Trivia::BlockComment("/**/".to_string()).is_doc_comment());
    }

    #[test]
    fn test_blank_line_detection() {
        let blank = vec![Trivia::Whitespace("\n\n    ".to_string())];
        assert!(has_blank_line_before(&blank));

        let single = vec![Trivia::Whitespace("\n    ".to_string())];
        assert!(!has_blank_line_before(&single));

        let after_comment = vec![
            Trivia::Whitespace("\n    ".to_string()),
            Trivia::LineComment("// x".to_string()),
            Trivia::Whitespace("\n\n    ".to_string()),
        ];
        assert!(!has_blank_line_before(&after_comment));
    }

    #[test]
    fn test_newline_count() {
        let run = vec![
            Trivia::Whitespace("\n".to_string()),
            Trivia::BlockComment("/* a\n b */".to_string()),
            Trivia::Whitespace("\n  ".to_string()),
        ];
        assert_eq!(newline_count(&run), 3);
        assert!(has_comments(&run));
        assert_eq!(trivia_text(&run), "\n/* a\n b */\n  ");
    }
}
