//! Per-run lint context

use crate::engine::LintConfig;
use glob::Pattern;
use javelin_core::{JavelinError, LinterConfiguration, Result};

/// Default limit for the line-length rule
pub const DEFAULT_MAX_LINE_LENGTH: usize = 120;

/// Package-name glob: `*` matches one segment, `**` any number of segments
///
/// Wildcards inside a segment (`acme*`) follow `glob` syntax.
#[derive(Debug, Clone)]
pub struct PackagePattern {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    AnyDepth,
    One(Pattern),
}

impl PackagePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let segments = pattern
            .split('.')
            .map(|segment| match segment {
                "**" => Ok(Segment::AnyDepth),
                _ => Pattern::new(segment).map(Segment::One).map_err(|e| {
                    JavelinError::config_error(format!(
                        "Invalid business package pattern '{pattern}': {e}"
                    ))
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, package: &str) -> bool {
        let names: Vec<&str> = package.split('.').collect();
        matches_segments(&self.segments, &names)
    }
}

fn matches_segments(segments: &[Segment], names: &[&str]) -> bool {
    match segments.split_first() {
        None => names.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=names.len()).any(|skip| matches_segments(rest, &names[skip..]))
        }
        Some((Segment::One(pattern), rest)) => match names.split_first() {
            Some((name, names)) => pattern.matches(name) && matches_segments(rest, names),
            None => false,
        },
    }
}

/// Everything a rule may consult besides the tree and the text
#[derive(Debug, Clone)]
pub struct LintContext {
    pub business_packages: Vec<PackagePattern>,
    pub max_line_length: usize,
    pub config: LintConfig,
}

impl Default for LintContext {
    fn default() -> Self {
        Self {
            business_packages: Vec::new(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            config: LintConfig::default(),
        }
    }
}

impl LintContext {
    /// Resolve the `linter` section of a configuration file
    pub fn from_configuration(linter: &LinterConfiguration) -> Result<Self> {
        let business_packages = linter
            .business_packages
            .iter()
            .flatten()
            .map(|p| PackagePattern::new(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            business_packages,
            max_line_length: linter.max_line_length.unwrap_or(DEFAULT_MAX_LINE_LENGTH),
            config: LintConfig::from_configuration(linter),
        })
    }

    pub fn with_business_packages<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.business_packages = patterns
            .into_iter()
            .map(|p| PackagePattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    pub fn with_config(mut self, config: LintConfig) -> Self {
        self.config = config;
        self
    }

    /// Check if a package name belongs to business code
    pub fn is_business_package(&self, package: &str) -> bool {
        self.business_packages.iter().any(|p| p.matches(package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(text: &str) -> PackagePattern {
        PackagePattern::new(text).unwrap()
    }

    #[test]
    fn test_single_segment_wildcard() {
        let p = pattern("com.acme.*.domain");
        assert!(p.matches("com.acme.billing.domain"));
        assert!(!p.matches("com.acme.domain"));
        assert!(!p.matches("com.acme.billing.core.domain"));
    }

    #[test]
    fn test_any_depth_wildcard() {
        let p = pattern("com.acme.**");
        assert!(p.matches("com.acme"));
        assert!(p.matches("com.acme.billing"));
        assert!(p.matches("com.acme.billing.domain.model"));
        assert!(!p.matches("com.other.billing"));

        let p = pattern("**.domain");
        assert!(p.matches("domain"));
        assert!(p.matches("com.acme.domain"));
        assert!(!p.matches("com.acme.domain.model"));
    }

    #[test]
    fn test_wildcard_inside_segment() {
        let p = pattern("com.acme*.domain");
        assert!(p.matches("com.acmecorp.domain"));
        assert!(!p.matches("com.other.domain"));
    }

    #[test]
    fn test_from_configuration() {
        let linter = LinterConfiguration {
            business_packages: Some(vec!["com.acme.**".to_string()]),
            max_line_length: Some(80),
            fail_on_warning: Some(true),
            ..Default::default()
        };
        let context = LintContext::from_configuration(&linter).unwrap();
        assert!(context.is_business_package("com.acme.orders"));
        assert!(!context.is_business_package("org.acme.orders"));
        assert_eq!(context.max_line_length, 80);
        assert!(context.config.fail_on_warning);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = PackagePattern::new("com.[acme").unwrap_err();
        assert!(err.to_string().contains("com.[acme"));
    }

    #[test]
    fn test_defaults() {
        let context = LintContext::default();
        assert_eq!(context.max_line_length, DEFAULT_MAX_LINE_LENGTH);
        assert!(!context.is_business_package("com.acme"));
    }
}
