//! Runs of blank lines and a missing final newline, both fixable.

use crate::core::{Diagnostic, LineRange, Replacement, SourceFile};
use crate::linter::FileCheck;

pub const NAME: &str = "blanklines";

pub struct BlankLines;

impl FileCheck for BlankLines {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Reports consecutive blank lines and files not ending with a newline"
    }

    fn check(&self, file: &SourceFile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut line_count = 0;

        for (idx, line) in file.lines().enumerate() {
            let number = idx + 1;
            line_count = number;
            if line.trim().is_empty() {
                run_start.get_or_insert(number);
                continue;
            }
            if let Some(start) = run_start.take() {
                diagnostics.extend(report_run(file, start, number - 1));
            }
        }
        if let Some(start) = run_start {
            diagnostics.extend(report_run(file, start, line_count));
        }

        if !file.text.is_empty() && !file.text.ends_with('\n') {
            diagnostics.push(
                Diagnostic::new(&file.path, line_count, "missing newline at end of file")
                    .with_replacement(Replacement::Insert {
                        line: line_count + 1,
                        column: 1,
                        text: "\n".to_string(),
                    }),
            );
        }

        diagnostics
    }
}

/// Keep the first blank line of `start..=end`, delete the rest.
fn report_run(file: &SourceFile, start: usize, end: usize) -> Option<Diagnostic> {
    if end <= start {
        return None;
    }
    let extra = LineRange::new(start + 1, end);
    Some(
        Diagnostic::new(
            &file.path,
            extra.from,
            format!("{} consecutive blank lines", end - start + 1),
        )
        .with_line_range(extra)
        .with_replacement(Replacement::Delete(extra)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Vec<Diagnostic> {
        BlankLines.check(&SourceFile::new("a.rs", text))
    }

    #[test]
    fn test_single_blank_lines_are_fine() {
        assert!(check("a\n\nb\n\nc\n").is_empty());
    }

    #[test]
    fn test_run_of_blank_lines_keeps_the_first() {
        let diagnostics = check("a\n\n  \n\nb\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(diagnostics[0].message, "3 consecutive blank lines");
        assert_eq!(
            diagnostics[0].replacement,
            Some(Replacement::Delete(LineRange::new(3, 4)))
        );
    }

    #[test]
    fn test_trailing_run_is_reported() {
        let diagnostics = check("a\n\n\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].lines(), LineRange::new(3, 3));
    }

    #[test]
    fn test_missing_final_newline() {
        let diagnostics = check("a\nb");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(
            diagnostics[0].replacement,
            Some(Replacement::Insert {
                line: 3,
                column: 1,
                text: "\n".into()
            })
        );
    }
}
