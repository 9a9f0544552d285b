use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::Stage;
use std::cmp::Ordering;

/// Orders diagnostics by file, line, column and linter.
pub struct SortResults;

/// A missing column sorts before any column.
pub fn compare(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then(a.line.cmp(&b.line))
        .then(a.column.cmp(&b.column))
        .then_with(|| a.from_linter.cmp(&b.from_linter))
}

impl Stage for SortResults {
    fn name(&self) -> &str {
        "sort_results"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        let mut sorted = diagnostics.to_vec();
        sorted.sort_by(compare);
        Ok(sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_order() {
        let out = SortResults
            .process(&[
                Diagnostic::new("b.rs", 1, "b1").with_linter("lll"),
                Diagnostic::new("a.rs", 10, "a10").with_linter("lll"),
                Diagnostic::new("a.rs", 2, "a2 col 5").with_column(5).with_linter("lll"),
                Diagnostic::new("a.rs", 2, "a2 godox").with_linter("godox"),
                Diagnostic::new("a.rs", 2, "a2 col 1").with_column(1).with_linter("lll"),
            ])
            .unwrap();

        let messages: Vec<&str> = out.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["a2 godox", "a2 col 1", "a2 col 5", "a10", "b1"]
        );
    }

    #[test]
    fn test_linter_name_breaks_ties() {
        let out = SortResults
            .process(&[
                Diagnostic::new("fileB.rs", 10, "fileB:10").with_linter("lll"),
                Diagnostic::new("fileA.rs", 5, "taskY").with_linter("taskY"),
                Diagnostic::new("fileA.rs", 10, "fileA:10").with_linter("lll"),
                Diagnostic::new("fileA.rs", 5, "taskX").with_linter("taskX"),
            ])
            .unwrap();

        let messages: Vec<&str> = out.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["taskX", "taskY", "fileA:10", "fileB:10"]);
    }
}
