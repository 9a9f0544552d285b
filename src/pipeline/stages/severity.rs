use super::rules::{RuleFiles, RuleMatcher};
use crate::config::SeverityConfig;
use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{transform_diagnostics, Stage};
use crate::registry::LinterRegistry;

/// Assigns a severity to every diagnostic.
///
/// The first matching rule wins. Otherwise a severity the linter already set
/// is kept when `keep_linter_severity` is on, and the default applies.
pub struct Severity {
    default: String,
    keep_linter_severity: bool,
    rules: Vec<(String, RuleMatcher)>,
    files: RuleFiles,
}

impl Severity {
    pub fn new(config: &SeverityConfig, registry: &LinterRegistry, files: RuleFiles) -> Result<Self> {
        let rules = config
            .rules
            .iter()
            .map(|r| {
                let matcher = RuleMatcher::new(&r.rule, config.case_sensitive, registry)?;
                Ok((r.severity.clone(), matcher))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            default: config.default.clone(),
            keep_linter_severity: config.keep_linter_severity,
            rules,
            files,
        })
    }

    fn severity_for(&self, d: &Diagnostic) -> Option<String> {
        if let Some((severity, _)) = self.rules.iter().find(|(_, r)| r.matches(d, &self.files)) {
            return Some(severity.clone());
        }
        if self.keep_linter_severity && !d.severity.is_empty() {
            return None;
        }
        Some(self.default.clone())
    }
}

impl Stage for Severity {
    fn name(&self) -> &str {
        "severity"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        Ok(transform_diagnostics(diagnostics, |d| {
            if let Some(severity) = self.severity_for(d) {
                d.severity = severity;
            }
        }))
    }
}
