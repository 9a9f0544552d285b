use crate::core::Diagnostic;
use crate::errors::Result;
use crate::io::LineCache;
use crate::pipeline::stage::{transform_diagnostics, Stage};
use std::sync::Arc;

/// Attaches the source text of the reported lines.
pub struct SourceCode {
    lines: Arc<LineCache>,
    missing: usize,
}

impl SourceCode {
    pub fn new(lines: Arc<LineCache>) -> Self {
        Self { lines, missing: 0 }
    }
}

impl Stage for SourceCode {
    fn name(&self) -> &str {
        "source_code"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        let mut missing = 0;
        let out = transform_diagnostics(diagnostics, |d| {
            if !d.source_lines.is_empty() {
                return;
            }
            let range = d.lines();
            match self.lines.range(&d.file_path, range.from, range.to) {
                Ok(lines) => d.source_lines = lines,
                Err(e) => {
                    log::debug!("Can't get source lines of {}: {}", d.position(), e);
                    missing += 1;
                }
            }
        });
        self.missing += missing;
        Ok(out)
    }

    fn finish(&mut self) {
        if self.missing > 0 {
            log::debug!("No source lines for {} issues", self.missing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LineRange;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_attaches_lines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.rs"), "one\ntwo\nthree\n").unwrap();

        let mut stage = SourceCode::new(Arc::new(LineCache::new(dir.path())));
        let out = stage
            .process(&[
                Diagnostic::new("a.rs", 2, "single"),
                Diagnostic::new("a.rs", 2, "range").with_line_range(LineRange::new(2, 3)),
                Diagnostic::new("missing.rs", 1, "no file"),
            ])
            .unwrap();

        assert_eq!(out[0].source_lines, vec!["two"]);
        assert_eq!(out[1].source_lines, vec!["two", "three"]);
        assert!(out[2].source_lines.is_empty());
        assert_eq!(stage.missing, 1);
    }
}
