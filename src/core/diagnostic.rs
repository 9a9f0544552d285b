//! The unit flowing through the runner and the pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inclusive 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub from: usize,
    pub to: usize,
}

impl LineRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn single(line: usize) -> Self {
        Self { from: line, to: line }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.from && line <= self.to
    }

    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

/// Suggested source edit attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// Remove the given lines entirely.
    Delete(LineRange),
    /// Insert `text` before the 1-based `column` of `line`.
    ///
    /// A `line` one past the end of the file appends at the end.
    Insert {
        line: usize,
        column: usize,
        text: String,
    },
}

impl Replacement {
    /// Lines touched by this edit, used to detect overlapping fixes.
    pub fn span(&self) -> LineRange {
        match self {
            Replacement::Delete(range) => *range,
            Replacement::Insert { line, .. } => LineRange::single(*line),
        }
    }
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file_path: PathBuf,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_range: Option<LineRange>,
    pub message: String,
    /// Name of the linter that reported this diagnostic.
    #[serde(default)]
    pub from_linter: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<Replacement>,
    /// Source text of the reported line(s), filled by the source-code stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_lines: Vec<String>,
}

impl Diagnostic {
    pub fn new(file_path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column: None,
            line_range: None,
            message: message.into(),
            from_linter: String::new(),
            severity: String::new(),
            replacement: None,
            source_lines: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_line_range(mut self, range: LineRange) -> Self {
        self.line_range = Some(range);
        self
    }

    pub fn with_linter(mut self, linter: impl Into<String>) -> Self {
        self.from_linter = linter.into();
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = Some(replacement);
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Lines covered by the diagnostic: its range, or just its line.
    pub fn lines(&self) -> LineRange {
        self.line_range.unwrap_or_else(|| LineRange::single(self.line))
    }

    /// Position as `file:line[:column]`.
    pub fn position(&self) -> String {
        match self.column {
            Some(col) => format!("{}:{}:{}", self.file_path.display(), self.line, col),
            None => format!("{}:{}", self.file_path.display(), self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_with_and_without_column() {
        let d = Diagnostic::new("src/a.rs", 4, "msg");
        assert_eq!(d.position(), "src/a.rs:4");
        assert_eq!(d.with_column(7).position(), "src/a.rs:4:7");
    }

    #[test]
    fn test_lines_defaults_to_single_line() {
        let d = Diagnostic::new("a.rs", 3, "msg");
        assert_eq!(d.lines(), LineRange::single(3));

        let d = d.with_line_range(LineRange::new(3, 5));
        assert!(d.lines().contains(5));
    }

    #[test]
    fn test_range_overlap() {
        assert!(LineRange::new(1, 3).overlaps(&LineRange::new(3, 4)));
        assert!(!LineRange::new(1, 2).overlaps(&LineRange::new(3, 4)));
    }

    #[test]
    fn test_replacement_span() {
        let insert = Replacement::Insert {
            line: 9,
            column: 1,
            text: "\n".into(),
        };
        assert_eq!(insert.span(), LineRange::single(9));
        assert_eq!(
            Replacement::Delete(LineRange::new(2, 4)).span(),
            LineRange::new(2, 4)
        );
    }
}
