//! Rule framework and per-file analyzer
//!
//! An analysis run moves through fixed stages, each entered once:
//! `Parsed -> SuppressionsExtracted -> RulesEvaluated -> Filtered -> Reported`.

use crate::context::LintContext;
use crate::suppression::{extract_suppressions, is_suppressed};
use javelin_core::cst::{CstNode, parse};
use javelin_core::{
    Diagnostic, JavelinError, LinterConfiguration, Location, Result, Severity, SourceFile,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Categories for organizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Naming, layout and import style
    Style,
    /// Patterns that usually hide bugs or noise
    BestPractice,
    /// Layering constraints on business code
    Architecture,
}

impl RuleCategory {
    /// Return the kebab-case slug used in listings
    pub fn slug(&self) -> &'static str {
        match self {
            RuleCategory::Style => "style",
            RuleCategory::BestPractice => "best-practice",
            RuleCategory::Architecture => "architecture",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

/// Metadata associated with a rule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    /// Unique identifier, `FAMILY-CATEGORY-NN`
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// What the rule checks
    pub description: &'static str,
    pub default_severity: Severity,
    pub category: RuleCategory,
    /// Documentation URL for the rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<&'static str>,
    /// Code showing the preferred form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

impl RuleMetadata {
    /// Diagnostic for this rule at a 1-based position, default severity
    pub fn diagnostic(
        &self,
        source: &SourceFile,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Diagnostic {
        let mut diagnostic = Diagnostic::new(
            self.id,
            self.default_severity,
            message,
            Location::new(source.path.clone(), line, column),
        );
        if let Some(example) = self.example {
            diagnostic = diagnostic.with_example(example);
        }
        if let Some(url) = self.docs_url {
            diagnostic = diagnostic.with_docs_url(url);
        }
        diagnostic
    }
}

/// A lint rule
///
/// Rules never fail: a subtree they cannot classify yields no diagnostic.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Diagnostics for one file, in source order
    fn check(&self, root: &CstNode, source: &SourceFile, ctx: &LintContext) -> Vec<Diagnostic>;

    fn id(&self) -> &'static str {
        self.metadata().id
    }
}

/// Rules in registration order
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.ids())
            .finish()
    }
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in rule
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        for rule in crate::builtin::all_rules() {
            registry.register(rule);
        }
        registry
    }

    /// Register a rule; a second rule with the same id is ignored
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        if self.get(rule.id()).is_some() {
            tracing::warn!("Rule '{}' already registered, keeping existing", rule.id());
            return;
        }
        self.rules.push(rule);
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Resolved rule configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintConfig {
    pub severity_overrides: BTreeMap<String, Severity>,
    pub disabled: BTreeSet<String>,
    pub fail_on_warning: bool,
}

impl LintConfig {
    /// Resolve the `linter` section; a rule set to `off` joins the disabled set
    pub fn from_configuration(linter: &LinterConfiguration) -> Self {
        let mut config = Self {
            disabled: linter.disabled.iter().flatten().cloned().collect(),
            fail_on_warning: linter.fail_on_warning.unwrap_or(false),
            ..Default::default()
        };
        for (id, level) in linter.rules.iter().flatten() {
            match level.severity() {
                Some(severity) => {
                    config.severity_overrides.insert(id.clone(), severity);
                }
                None => {
                    config.disabled.insert(id.clone());
                }
            }
        }
        config
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !self.disabled.contains(rule_id)
    }

    pub fn with_override(mut self, rule_id: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(rule_id.into(), severity);
        self
    }

    pub fn with_disabled(mut self, rule_id: impl Into<String>) -> Self {
        self.disabled.insert(rule_id.into());
        self
    }

    pub fn with_fail_on_warning(mut self, fail_on_warning: bool) -> Self {
        self.fail_on_warning = fail_on_warning;
        self
    }
}

/// Pass/fail summary of a diagnostic set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOutcome {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub fail_on_warning: bool,
}

impl LintOutcome {
    pub fn from_diagnostics(diagnostics: &[Diagnostic], fail_on_warning: bool) -> Self {
        let mut outcome = Self {
            fail_on_warning,
            ..Default::default()
        };
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Error => outcome.errors += 1,
                Severity::Warning => outcome.warnings += 1,
                Severity::Info => outcome.infos += 1,
            }
        }
        outcome
    }

    /// Combine the counts of two runs
    pub fn merge(self, other: Self) -> Self {
        Self {
            errors: self.errors + other.errors,
            warnings: self.warnings + other.warnings,
            infos: self.infos + other.infos,
            fail_on_warning: self.fail_on_warning || other.fail_on_warning,
        }
    }

    pub fn passed(&self) -> bool {
        self.errors == 0 && !(self.fail_on_warning && self.warnings > 0)
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Stages of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Parsed,
    SuppressionsExtracted,
    RulesEvaluated,
    Filtered,
    Reported,
}

/// Runs the registered rules over one file at a time
///
/// An analyzer holds no per-file state, so one instance can serve many
/// threads.
#[derive(Debug)]
pub struct Analyzer {
    registry: RuleRegistry,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(RuleRegistry::with_builtin_rules())
    }
}

impl Analyzer {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Parse and analyze a source file
    pub fn analyze(&self, source: &SourceFile, ctx: &LintContext) -> Result<Vec<Diagnostic>> {
        let parse = parse(&source.text);
        if let Some(error) = parse.first_error() {
            return Err(JavelinError::parse_failed(
                &source.path,
                error.line,
                error.column,
                error.message.clone(),
            ));
        }
        self.analyze_cst(&parse.root, source, ctx)
    }

    /// Analyze an already parsed tree
    ///
    /// Trees holding unparsed regions are refused with `ParseFailed`.
    pub fn analyze_cst(
        &self,
        root: &CstNode,
        source: &SourceFile,
        ctx: &LintContext,
    ) -> Result<Vec<Diagnostic>> {
        if let Some(at) = root.first_error_position() {
            return Err(JavelinError::parse_failed(
                &source.path,
                at.line,
                at.column,
                "tree contains unparsed input",
            ));
        }
        let file = source.path.display().to_string();
        trace_stage(&file, AnalysisStage::Parsed);

        let suppressions = extract_suppressions(root);
        trace_stage(&file, AnalysisStage::SuppressionsExtracted);

        let mut diagnostics = Vec::new();
        for rule in self.registry.iter() {
            if !ctx.config.is_enabled(rule.id()) {
                continue;
            }
            let found = rule.check(root, source, ctx);
            match ctx.config.severity_overrides.get(rule.id()) {
                Some(&severity) => {
                    diagnostics.extend(found.into_iter().map(|d| d.with_severity(severity)));
                }
                None => diagnostics.extend(found),
            }
        }
        trace_stage(&file, AnalysisStage::RulesEvaluated);

        let before = diagnostics.len();
        diagnostics.retain(|d| !is_suppressed(d, &suppressions));
        tracing::debug!(
            file = %file,
            suppressions = suppressions.len(),
            dropped = before - diagnostics.len(),
            "applied suppressions"
        );
        trace_stage(&file, AnalysisStage::Filtered);

        trace_stage(&file, AnalysisStage::Reported);
        Ok(diagnostics)
    }
}

fn trace_stage(file: &str, stage: AnalysisStage) {
    tracing::trace!(file = %file, stage = ?stage, "analysis stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_core::RuleLevel;

    fn diagnostics(errors: usize, warnings: usize) -> Vec<Diagnostic> {
        let make = |severity| {
            Diagnostic::new("TEST-RULE-01", severity, "m", Location::new("A.java", 1, 1))
        };
        std::iter::repeat_n(Severity::Error, errors)
            .chain(std::iter::repeat_n(Severity::Warning, warnings))
            .map(make)
            .collect()
    }

    #[test]
    fn test_errors_fail_regardless_of_warning_policy() {
        let set = diagnostics(2, 3);
        assert!(!LintOutcome::from_diagnostics(&set, false).passed());
        assert!(!LintOutcome::from_diagnostics(&set, true).passed());
    }

    #[test]
    fn test_warnings_fail_only_when_configured() {
        let set = diagnostics(0, 3);
        assert!(LintOutcome::from_diagnostics(&set, false).passed());
        assert!(!LintOutcome::from_diagnostics(&set, true).passed());
        assert!(LintOutcome::from_diagnostics(&[], true).passed());
    }

    #[test]
    fn test_outcome_counts_and_merge() {
        let outcome = LintOutcome::from_diagnostics(&diagnostics(1, 2), false)
            .merge(LintOutcome::from_diagnostics(&diagnostics(0, 1), true));
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.warnings, 3);
        assert_eq!(outcome.total(), 4);
        assert!(outcome.fail_on_warning);
    }

    #[test]
    fn test_config_from_linter_section() {
        let linter = LinterConfiguration {
            rules: Some(BTreeMap::from([
                ("BEST-PRACTICE-02".to_string(), RuleLevel::Error),
                ("STYLE-IMPORT-01".to_string(), RuleLevel::Off),
            ])),
            disabled: Some(vec!["STYLE-FORMAT-01".to_string()]),
            ..Default::default()
        };
        let config = LintConfig::from_configuration(&linter);
        assert_eq!(
            config.severity_overrides.get("BEST-PRACTICE-02"),
            Some(&Severity::Error)
        );
        assert!(!config.is_enabled("STYLE-IMPORT-01"));
        assert!(!config.is_enabled("STYLE-FORMAT-01"));
        assert!(config.is_enabled("BEST-PRACTICE-01"));
        assert!(!config.fail_on_warning);
    }

    #[test]
    fn test_builtin_registration_order() {
        let registry = RuleRegistry::with_builtin_rules();
        assert_eq!(
            registry.ids(),
            vec![
                "STYLE-NAMING-01",
                "STYLE-NAMING-02",
                "STYLE-NAMING-03",
                "STYLE-FORMAT-01",
                "STYLE-IMPORT-01",
                "BEST-PRACTICE-01",
                "BEST-PRACTICE-02",
                "BEST-PRACTICE-03",
                "ARCH-DOMAIN-01",
                "ARCH-DOMAIN-02",
            ]
        );
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut registry = RuleRegistry::with_builtin_rules();
        let before = registry.len();
        for rule in crate::builtin::all_rules().into_iter().take(1) {
            registry.register(rule);
        }
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let source = SourceFile::new("Broken.java", "class A {\n    void f( {\n}\n");
        let err = Analyzer::default()
            .analyze(&source, &LintContext::default())
            .unwrap_err();
        assert!(matches!(err, JavelinError::ParseFailed { .. }));
        assert!(err.to_string().starts_with("Broken.java:"));
    }

    #[test]
    fn test_metadata_serializes_category_slug() {
        let registry = RuleRegistry::with_builtin_rules();
        let rule = registry.get("BEST-PRACTICE-01").unwrap();
        let value = serde_json::to_value(rule.metadata()).unwrap();
        assert_eq!(value["category"], "best-practice");
        assert_eq!(value["defaultSeverity"], "error");
    }
}
