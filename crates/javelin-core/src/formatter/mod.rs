//! Canonical formatting of Java sources
//!
//! Formatting parses the text into a lossless CST and prints it again with
//! the alignment-aware printer. The result is a fixed point: formatting
//! formatted output returns it unchanged.
//!
//! ```rust
//! use javelin_core::formatter::{FormatOptions, format_text};
//!
//! let formatted = format_text("class A{void f(){g( 1,2 );}}", &FormatOptions::default()).unwrap();
//! assert_eq!(formatted, "class A {\n    void f() {\n        g(1, 2);\n    }\n}\n");
//! ```

mod imports;
mod options;
mod output;
mod printer;
mod spacing;

pub use imports::{ImportGroup, group_imports};
pub use options::{FormatOptions, IndentStyle};
pub use spacing::{SpacingState, space_before};

use crate::cst::{CstNode, parse};
use crate::error::JavelinError;
use crate::result::Result;
use crate::source::SourceFile;
use similar::TextDiff;
use std::path::Path;

/// Result of formatting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The formatted content
    pub content: String,
    /// Whether any changes were made
    pub changed: bool,
    /// Original content for comparison
    pub original: String,
}

impl FormatResult {
    /// Unified diff from the original to the formatted content
    pub fn diff(&self, path: &Path) -> String {
        let name = path.display().to_string();
        TextDiff::from_lines(&self.original, &self.content)
            .unified_diff()
            .context_radius(3)
            .header(&name, &name)
            .to_string()
    }
}

/// Format a source file
pub fn format(source: &SourceFile, options: &FormatOptions) -> Result<FormatResult> {
    let parse = parse(&source.text);
    if let Some(error) = parse.first_error() {
        tracing::debug!(
            "Refusing to format {}: {} parse error(s)",
            source.path.display(),
            parse.errors.len()
        );
        return Err(JavelinError::parse_failed(
            &source.path,
            error.line,
            error.column,
            &error.message,
        ));
    }

    let content = format_cst(&source.path, &parse.root, options)?;
    let changed = content != source.text;
    tracing::debug!("Formatted {} (changed: {})", source.path.display(), changed);
    Ok(FormatResult {
        content,
        changed,
        original: source.text.clone(),
    })
}

/// Format text that has no file behind it
pub fn format_text(text: &str, options: &FormatOptions) -> Result<String> {
    format(&SourceFile::new("<input>", text), options).map(|result| result.content)
}

/// Print an already parsed CST
///
/// Trees holding unparsed regions are refused with `ParseFailed`.
pub fn format_cst(file: &Path, root: &CstNode, options: &FormatOptions) -> Result<String> {
    if let Some(at) = root.first_error_position() {
        return Err(JavelinError::parse_failed(
            file,
            at.line,
            at.column,
            "tree contains unparsed input",
        ));
    }
    printer::print(root, options)
}

/// Whether the source is already in canonical form
pub fn check(source: &SourceFile, options: &FormatOptions) -> Result<bool> {
    format(source, options).map(|result| !result.changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn fmt(source: &str) -> String {
        format_text(source, &FormatOptions::default()).unwrap()
    }

    fn fmt_with(source: &str, options: &FormatOptions) -> String {
        format_text(source, options).unwrap()
    }

    fn narrow() -> FormatOptions {
        FormatOptions {
            line_width: 40,
            ..FormatOptions::default()
        }
    }

    fn in_method(statement: &str) -> String {
        format!("class A {{\n    void f() {{\n        {statement}\n    }}\n}}\n")
    }

    #[test]
    fn test_basic_layout() {
        let out = fmt("package a.b;\nclass A{int x;void f(){if(x>0){g();}else{h();}}}");
        assert_eq!(
            out,
            "package a.b;\n\nclass A {\n    int x;\n\n    void f() {\n        if (x > 0) {\n            g();\n        } else {\n            h();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(fmt(""), "");
        assert_eq!(fmt("\n\n"), "");
    }

    #[test]
    fn test_chain_aligns_on_receiver_dot() {
        let out = fmt(&in_method("receiver.method1(a).method2(b);"));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        receiver.method1(a)\n                .method2(b);\n    }\n}\n"
        );
    }

    #[test]
    fn test_chain_aligns_on_member_select_dot() {
        let out = fmt(&in_method("this.items.stream().map(x).toList();"));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        this.items.stream()\n            .map(x)\n            .toList();\n    }\n}\n"
        );
    }

    #[test]
    fn test_chain_alignment_can_be_disabled() {
        let options = FormatOptions {
            align_chains: false,
            ..FormatOptions::default()
        };
        let source = in_method("receiver.method1(a).method2(b);");
        assert_eq!(fmt_with(&source, &options), source);
    }

    #[test]
    fn test_argument_breaking_boundary() {
        let fits = in_method("submit(alpha, beta, gamma, delt);");
        assert_eq!(fits.lines().nth(2).unwrap().find(')'), Some(39));
        assert_eq!(fmt_with(&fits, &narrow()), fits);

        let overflows = in_method("submit(alpha, beta, gamma, delta);");
        assert_eq!(
            fmt_with(&overflows, &narrow()),
            "class A {\n    void f() {\n        submit(alpha,\n               beta,\n               gamma,\n               delta);\n    }\n}\n"
        );
    }

    #[test]
    fn test_single_argument_never_breaks() {
        let source = in_method("submit(aVeryLongArgumentNameThatOverflows);");
        assert_eq!(fmt_with(&source, &narrow()), source);
    }

    fn width(line_width: usize) -> FormatOptions {
        FormatOptions {
            line_width,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn test_block_comment_in_broken_list_is_stable() {
        let options = width(60);
        let once = fmt_with(
            &in_method("bar(alphaValue, /* inline */ betaValue, gammaValue, deltaValue, epsilon);"),
            &options,
        );
        assert_eq!(
            once,
            "class A {\n    void f() {\n        bar(alphaValue,\n            /* inline */ betaValue,\n            gammaValue,\n            deltaValue,\n            epsilon);\n    }\n}\n"
        );
        assert_eq!(fmt_with(&once, &options), once);
    }

    #[test]
    fn test_line_comment_breaks_list_one_per_line() {
        let options = width(60);
        let out = fmt_with(
            &in_method("bar(alphaValue, // note\n        betaValue, gammaValue, deltaValue, epsilonValue, zeta);"),
            &options,
        );
        assert_eq!(
            out,
            "class A {\n    void f() {\n        bar(alphaValue, // note\n            betaValue,\n            gammaValue,\n            deltaValue,\n            epsilonValue,\n            zeta);\n    }\n}\n"
        );
        assert!(out.lines().all(|line| line.len() <= 60), "overlong line in {out:?}");
        assert_eq!(fmt_with(&out, &options), out);
    }

    #[test]
    fn test_block_comments_let_closers_hug() {
        assert_eq!(fmt(&in_method("f(a /* a */\n, b);")), in_method("f(a /* a */, b);"));
        assert_eq!(fmt(&in_method("foo(/* none */ );")), in_method("foo(/* none */);"));
    }

    #[test]
    fn test_lambda_block_in_chain_indents_from_chain_column() {
        let out = fmt(&in_method("list.stream().map(x -> { return x; }).toList();"));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        list.stream()\n            .map(x -> {\n                return x;\n            })\n            .toList();\n    }\n}\n"
        );
    }

    #[test]
    fn test_lambda_arguments_break_inside_breaking_chain() {
        let out = fmt_with(&in_method("repo.find(id, x -> x.ok()).save();"), &width(100));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        repo.find(id,\n                  x -> x.ok())\n            .save();\n    }\n}\n"
        );
    }

    #[test]
    fn test_ternary_breaks_aligned_to_condition() {
        let out = fmt_with(
            &in_method("int x = condition ? firstValue : secondValue;"),
            &narrow(),
        );
        assert_eq!(
            out,
            "class A {\n    void f() {\n        int x = condition\n                ? firstValue\n                : secondValue;\n    }\n}\n"
        );
    }

    #[test]
    fn test_imports_are_grouped() {
        let source = "import com.example.Foo;\nimport java.util.List;\nimport static org.junit.Assert.assertEquals;\nimport org.slf4j.Logger;\nimport javax.inject.Inject;\nclass A {}\n";
        assert_eq!(
            fmt(source),
            "import java.util.List;\n\nimport javax.inject.Inject;\n\nimport org.slf4j.Logger;\n\nimport com.example.Foo;\n\nimport static org.junit.Assert.assertEquals;\n\nclass A {}\n"
        );
    }

    #[test]
    fn test_imports_keep_order_without_reorganizing() {
        let options = FormatOptions {
            reorganize_imports: false,
            ..FormatOptions::default()
        };
        let source = "import com.example.Foo;\nimport java.util.List;\n\nclass A {}\n";
        assert_eq!(fmt_with(source, &options), source);
    }

    #[test]
    fn test_blank_lines_between_members() {
        let out = fmt("class A {\n  int a;\n  int b;\n\n  int c;\n  void f() {}\n  void g() {}\n}\n");
        assert_eq!(
            out,
            "class A {\n    int a;\n    int b;\n\n    int c;\n\n    void f() {}\n\n    void g() {}\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_between_statements_collapse() {
        let out = fmt(&in_method("a();\n\n\n\n        b();"));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        a();\n\n        b();\n    }\n}\n"
        );
    }

    #[test]
    fn test_annotations_on_own_lines() {
        let out = fmt("class A { @Override @Deprecated public String toString() { return \"\"; } }");
        assert_eq!(
            out,
            "class A {\n    @Override\n    @Deprecated\n    public String toString() {\n        return \"\";\n    }\n}\n"
        );
    }

    #[test]
    fn test_comments_survive() {
        let source = "class A {\n    // leading\n    void f() {\n        g(); // trailing\n        /* block */ h();\n    }\n}\n";
        assert_eq!(fmt(source), source);
    }

    #[test]
    fn test_enum_constants_one_per_line() {
        assert_eq!(
            fmt("enum Color { RED, GREEN, BLUE }"),
            "enum Color {\n    RED,\n    GREEN,\n    BLUE\n}\n"
        );
    }

    #[test]
    fn test_switch_groups() {
        let out = fmt(&in_method("switch (x) { case 1: a(); break; default: b(); }"));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        switch (x) {\n            case 1:\n                a();\n                break;\n            default:\n                b();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn test_non_block_body_on_next_line() {
        let out = fmt(&in_method("if (x) return;"));
        assert_eq!(
            out,
            "class A {\n    void f() {\n        if (x)\n            return;\n    }\n}\n"
        );
    }

    #[test]
    fn test_tabs() {
        let options = FormatOptions {
            indent_style: IndentStyle::Tabs,
            ..FormatOptions::default()
        };
        assert_eq!(
            fmt_with("class A { void f() {} }", &options),
            "class A {\n\tvoid f() {}\n}\n"
        );
    }

    #[test]
    fn test_idempotence() {
        let sources = [
            "class A{void f(){list.stream().filter(x->x>0).map(x->{return x*2;}).collect(Collectors.toList());}}",
            "public record Point(int x,int y){Point{if(x<0)throw new IllegalArgumentException();}}",
            "class A{int f(Object o){return switch(o){case String s when s.isEmpty()->0;case Integer i->i;default->{yield -1;}};}}",
            "class A{void f(){try(var in=open()){read(in);}catch(IOException|RuntimeException e){log(e);}finally{close();}}}",
            "interface Repo<T extends Comparable<T>>{<R> List<R> map(Function<? super T,? extends R> f);}",
            "class A{void f(){for(int i=0;i<n;i++){a[i]=i<<2;}do{x--;}while(x>0);}}",
            "class A{\n// one\n\n// two\nvoid f(){g(a, // c\nb);}\n}",
        ];
        let options = narrow();
        for source in sources {
            let once = fmt_with(source, &options);
            let twice = fmt_with(&once, &options);
            assert_eq!(once, twice, "not idempotent for {source:?}");
        }
    }

    #[test]
    fn test_repeated_formatting_is_stable() {
        let source = "class A{void f(){result=service.load(id).orElseThrow(()->new Missing(id)).value(alpha,beta,gamma);}}";
        let options = narrow();
        let first = fmt_with(source, &options);
        let mut current = first.clone();
        for _ in 0..10 {
            let next = fmt_with(&current, &options);
            assert_eq!(next.len(), first.len());
            assert_eq!(next.lines().count(), first.lines().count());
            current = next;
        }
        assert_eq!(current, first);
    }

    #[test]
    fn test_check_and_format_result() {
        let options = FormatOptions::default();
        let canonical = SourceFile::new("A.java", "class A {}\n");
        assert!(check(&canonical, &options).unwrap());

        let messy = SourceFile::new("A.java", "class A{}");
        assert!(!check(&messy, &options).unwrap());
        let result = format(&messy, &options).unwrap();
        assert!(result.changed);
        let diff = result.diff(&messy.path);
        assert!(diff.contains("-class A{}"));
        assert!(diff.contains("+class A {}"));
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let source = SourceFile::new("Broken.java", "class A {\n    void f( {\n}\n");
        let err = format(&source, &FormatOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        match err {
            JavelinError::ParseFailed { file, line, .. } => {
                assert_eq!(file, Path::new("Broken.java"));
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
