use crate::core::Diagnostic;
use crate::errors::{compile_regex, Result};
use crate::pipeline::stage::{filter_diagnostics, Stage};
use regex::Regex;

/// Drops diagnostics whose message matches any `issues.exclude` pattern.
pub struct Exclude {
    pattern: Option<Regex>,
    excluded: usize,
}

impl Exclude {
    pub fn new(patterns: &[String], case_sensitive: bool) -> Result<Self> {
        let pattern = if patterns.is_empty() {
            None
        } else {
            let joined = format!("({})", patterns.join("|"));
            let joined = if case_sensitive {
                joined
            } else {
                format!("(?i){joined}")
            };
            Some(compile_regex(&joined)?)
        };
        Ok(Self {
            pattern,
            excluded: 0,
        })
    }
}

impl Stage for Exclude {
    fn name(&self) -> &str {
        "exclude"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        let Some(pattern) = &self.pattern else {
            return Ok(diagnostics.to_vec());
        };
        let kept = filter_diagnostics(diagnostics, |d| !pattern.is_match(&d.message));
        self.excluded += diagnostics.len() - kept.len();
        Ok(kept)
    }

    fn finish(&mut self) {
        if self.excluded > 0 {
            log::debug!("Excluded {} issues by message patterns", self.excluded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excludes_by_any_pattern() {
        let mut stage = Exclude::new(&["line is \\d+".into(), "TODO".into()], false).unwrap();
        let out = stage
            .process(&[
                Diagnostic::new("a.rs", 1, "the LINE IS 130 characters long"),
                Diagnostic::new("a.rs", 2, "Line contains todo"),
                Diagnostic::new("a.rs", 3, "missing newline at end of file"),
            ])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].line, 3);
    }

    #[test]
    fn test_case_sensitive() {
        let mut stage = Exclude::new(&["TODO".into()], true).unwrap();
        let out = stage
            .process(&[Diagnostic::new("a.rs", 1, "Line contains todo")])
            .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_no_patterns_passes_everything() {
        let mut stage = Exclude::new(&[], false).unwrap();
        let out = stage.process(&[Diagnostic::new("a.rs", 1, "x")]).unwrap();
        assert_eq!(out.len(), 1);
    }
}
