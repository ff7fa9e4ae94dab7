//! Terminal summaries for the format and lint commands

use colored::*;
use javelin_rules::LintOutcome;
use std::time::Duration;

/// Counts gathered by `javelin format`
#[derive(Debug, Clone, Default)]
pub struct FormatSummary {
    pub files_checked: usize,
    pub files_changed: usize,
    pub files_failed: usize,
}

impl FormatSummary {
    pub fn print(&self, check: bool, elapsed: Duration) {
        let unchanged = self.files_checked - self.files_changed - self.files_failed;
        if check {
            if self.files_changed == 0 {
                eprintln!("{} {} files already formatted", "✓".green(), unchanged);
            } else {
                eprintln!(
                    "{} {} of {} files need formatting",
                    "✗".red(),
                    self.files_changed.to_string().red(),
                    self.files_checked
                );
            }
        } else {
            eprintln!(
                "{} Formatted {} files ({} unchanged)",
                "✓".green(),
                self.files_changed.to_string().green(),
                unchanged
            );
        }
        if self.files_failed > 0 {
            eprintln!(
                "  {} files could not be processed",
                self.files_failed.to_string().red()
            );
        }
        eprintln!("  Completed in {}", format_duration(elapsed));
    }
}

/// Human summary after lint diagnostics
pub fn print_lint_summary(files_checked: usize, files_failed: usize, outcome: &LintOutcome) {
    println!("\n{}", "Summary:".bold());
    println!("  Files checked: {files_checked}");
    if outcome.total() == 0 {
        println!("  {} No issues found", "✓".green());
    } else {
        println!("  Issues found:");
        if outcome.errors > 0 {
            println!("    Errors: {}", outcome.errors.to_string().red());
        }
        if outcome.warnings > 0 {
            println!("    Warnings: {}", outcome.warnings.to_string().yellow());
        }
        if outcome.infos > 0 {
            println!("    Info: {}", outcome.infos.to_string().blue());
        }
    }
    if files_failed > 0 {
        println!("  Files failed: {}", files_failed.to_string().red());
    }
    let verdict = if outcome.passed() {
        "passed".green()
    } else {
        "failed".red()
    };
    println!("  Result: {verdict}");
}

/// Format duration in human-readable form
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
