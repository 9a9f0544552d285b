//! Long lines.

use crate::config::LllSettings;
use crate::core::{Diagnostic, SourceFile};
use crate::linter::FileCheck;

pub const NAME: &str = "lll";

/// Comment directives (`//go:generate`, `//line`) are exempt.
const DIRECTIVE_PREFIXES: &[&str] = &["//go:", "//line ", "#!"];

pub struct LineLength {
    max: usize,
    tab: String,
}

impl LineLength {
    pub fn new(settings: &LllSettings) -> Self {
        Self {
            max: settings.line_length,
            tab: " ".repeat(settings.tab_width),
        }
    }
}

impl FileCheck for LineLength {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Reports long lines"
    }

    fn check(&self, file: &SourceFile) -> Vec<Diagnostic> {
        file.lines()
            .enumerate()
            .filter(|(_, line)| !DIRECTIVE_PREFIXES.iter().any(|p| line.starts_with(p)))
            .filter_map(|(idx, line)| {
                let len = line.replace('\t', &self.tab).chars().count();
                (len > self.max).then(|| {
                    Diagnostic::new(
                        &file.path,
                        idx + 1,
                        format!(
                            "the line is {} characters long, which exceeds the maximum of {} characters.",
                            len, self.max
                        ),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str, line_length: usize, tab_width: usize) -> Vec<Diagnostic> {
        LineLength::new(&LllSettings {
            line_length,
            tab_width,
        })
        .check(&SourceFile::new("a.rs", text))
    }

    #[test]
    fn test_reports_lines_over_the_limit() {
        let diagnostics = check("short\nthis one is long\n", 10, 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert!(diagnostics[0].message.starts_with("the line is 16 characters long"));
    }

    #[test]
    fn test_tabs_count_as_tab_width() {
        assert_eq!(check("\tabc\n", 4, 1).len(), 0);
        assert_eq!(check("\tabc\n", 4, 4).len(), 1);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(check("ééééé\n", 5, 1).is_empty());
    }

    #[test]
    fn test_directives_are_exempt() {
        assert!(check("//go:generate some very long command line\n", 10, 1).is_empty());
    }
}
