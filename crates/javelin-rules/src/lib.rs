//! Javelin Rules
//!
//! Lint analysis over the Javelin CST: suppression extraction, the rule
//! framework with its registry, the per-file analyzer and the built-in
//! rule set.

pub mod builtin;
pub mod context;
pub mod engine;
pub mod suppression;

pub use context::{LintContext, PackagePattern};
pub use engine::{
    AnalysisStage, Analyzer, LintConfig, LintOutcome, Rule, RuleCategory, RuleMetadata,
    RuleRegistry,
};
pub use suppression::{Suppression, extract_suppressions, is_suppressed};
