use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use std::collections::BTreeMap;

/// Keeps at most `limit` diagnostics per linter. 0 or fix mode disables it.
pub struct MaxFromLinter {
    limit: usize,
    counts: BTreeMap<String, usize>,
}

impl MaxFromLinter {
    pub fn new(limit: usize, fix: bool) -> Self {
        Self {
            limit: if fix { 0 } else { limit },
            counts: BTreeMap::new(),
        }
    }
}

impl Stage for MaxFromLinter {
    fn name(&self) -> &str {
        "max_from_linter"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.limit == 0 {
            return Ok(diagnostics.to_vec());
        }
        Ok(filter_diagnostics(diagnostics, |d| {
            let count = self.counts.entry(d.from_linter.clone()).or_insert(0);
            *count += 1;
            *count <= self.limit
        }))
    }

    fn finish(&mut self) {
        for (linter, count) in &self.counts {
            if *count > self.limit {
                log::info!(
                    "{}/{} issues from linter {} were hidden, use --max-issues-per-linter",
                    count - self.limit,
                    count,
                    linter
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_per_linter() {
        let input: Vec<Diagnostic> = (1..=4)
            .flat_map(|line| {
                [
                    Diagnostic::new("a.rs", line, format!("long {line}")).with_linter("lll"),
                    Diagnostic::new("a.rs", line, format!("todo {line}")).with_linter("godox"),
                ]
            })
            .collect();

        let mut stage = MaxFromLinter::new(2, false);
        let out = stage.process(&input).unwrap();
        assert_eq!(out.iter().filter(|d| d.from_linter == "lll").count(), 2);
        assert_eq!(out.iter().filter(|d| d.from_linter == "godox").count(), 2);
        assert_eq!(stage.counts["lll"], 4);
    }
}
