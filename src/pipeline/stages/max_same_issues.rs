use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use std::collections::BTreeMap;

/// Keeps at most `limit` diagnostics with the same message text.
///
/// A limit of 0 disables the cap, as does fix mode.
pub struct MaxSameIssues {
    limit: usize,
    counts: BTreeMap<String, usize>,
}

impl MaxSameIssues {
    pub fn new(limit: usize, fix: bool) -> Self {
        Self {
            limit: if fix { 0 } else { limit },
            counts: BTreeMap::new(),
        }
    }
}

impl Stage for MaxSameIssues {
    fn name(&self) -> &str {
        "max_same_issues"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.limit == 0 {
            return Ok(diagnostics.to_vec());
        }
        Ok(filter_diagnostics(diagnostics, |d| {
            let count = self.counts.entry(d.message.clone()).or_insert(0);
            *count += 1;
            *count <= self.limit
        }))
    }

    fn finish(&mut self) {
        for (text, count) in &self.counts {
            if *count > self.limit {
                log::info!(
                    "{}/{} issues with text {:?} were hidden, use --max-same-issues",
                    count - self.limit,
                    count,
                    text
                );
            }
        }
    }
}
