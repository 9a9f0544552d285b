use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use std::collections::HashSet;
use std::path::PathBuf;

type LineKey = (PathBuf, usize, String);
type ExactKey = (PathBuf, usize, Option<usize>, String, String);

/// Removes repeated diagnostics.
///
/// Exact duplicates are always removed. With `by_line` only the first
/// diagnostic of a linter on a given line survives.
pub struct UniqByLine {
    by_line: bool,
    seen_lines: HashSet<LineKey>,
    seen: HashSet<ExactKey>,
}

impl UniqByLine {
    pub fn new(by_line: bool) -> Self {
        Self {
            by_line,
            seen_lines: HashSet::new(),
            seen: HashSet::new(),
        }
    }

    fn should_pass(&mut self, d: &Diagnostic) -> bool {
        let exact = (
            d.file_path.clone(),
            d.line,
            d.column,
            d.from_linter.clone(),
            d.message.clone(),
        );
        if !self.seen.insert(exact) {
            return false;
        }
        if !self.by_line {
            return true;
        }
        self.seen_lines
            .insert((d.file_path.clone(), d.line, d.from_linter.clone()))
    }
}

impl Stage for UniqByLine {
    fn name(&self) -> &str {
        "uniq_by_line"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        Ok(filter_diagnostics(diagnostics, |d| self.should_pass(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> Vec<Diagnostic> {
        vec![
            Diagnostic::new("a.rs", 3, "first").with_linter("lll"),
            Diagnostic::new("a.rs", 3, "first").with_linter("lll"),
            Diagnostic::new("a.rs", 3, "second").with_linter("lll"),
            Diagnostic::new("a.rs", 3, "other linter").with_linter("godox"),
        ]
    }

    #[test]
    fn test_one_per_line_and_linter() {
        let out = UniqByLine::new(true).process(&input()).unwrap();
        let messages: Vec<&str> = out.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "other linter"]);
    }

    #[test]
    fn test_exact_duplicates_removed_when_disabled() {
        let out = UniqByLine::new(false).process(&input()).unwrap();
        assert_eq!(out.len(), 3);
    }
}
