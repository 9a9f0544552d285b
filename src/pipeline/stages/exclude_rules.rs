use super::rules::{RuleFiles, RuleMatcher};
use crate::config::ExcludeRule;
use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use crate::registry::LinterRegistry;

/// Drops diagnostics matched by any user exclude rule.
pub struct ExcludeRules {
    rules: Vec<RuleMatcher>,
    files: RuleFiles,
    hits: Vec<usize>,
}

impl ExcludeRules {
    pub fn new(
        rules: &[ExcludeRule],
        case_sensitive: bool,
        registry: &LinterRegistry,
        files: RuleFiles,
    ) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|r| RuleMatcher::new(&r.rule, case_sensitive, registry))
            .collect::<Result<Vec<_>>>()?;
        let hits = vec![0; rules.len()];
        Ok(Self { rules, files, hits })
    }
}

impl Stage for ExcludeRules {
    fn name(&self) -> &str {
        "exclude_rules"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.rules.is_empty() {
            return Ok(diagnostics.to_vec());
        }
        Ok(filter_diagnostics(diagnostics, |d| {
            match self.rules.iter().position(|r| r.matches(d, &self.files)) {
                Some(index) => {
                    self.hits[index] += 1;
                    false
                }
                None => true,
            }
        }))
    }

    fn finish(&mut self) {
        for (index, hits) in self.hits.iter().enumerate() {
            if *hits > 0 {
                log::debug!("Exclude rule #{} matched {} issues", index + 1, hits);
            }
        }
    }
}
