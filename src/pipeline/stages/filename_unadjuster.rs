use crate::core::{Diagnostic, LineDirectives, Replacement};
use crate::errors::Result;
use crate::pipeline::stage::{transform_diagnostics, Stage};
use std::path::PathBuf;

/// Maps positions in virtual files named by `//line FILE:N` directives back
/// to the physical file and line they were generated into.
pub struct FilenameUnadjuster {
    root: PathBuf,
    directives: LineDirectives,
    remapped: usize,
}

impl FilenameUnadjuster {
    pub fn new(root: impl Into<PathBuf>, directives: LineDirectives) -> Self {
        Self {
            root: root.into(),
            directives,
            remapped: 0,
        }
    }

    fn unadjust(&self, d: &mut Diagnostic) -> bool {
        let mapped = self.directives.unadjust(&d.file_path, d.line).or_else(|| {
            d.file_path
                .strip_prefix(&self.root)
                .ok()
                .and_then(|rel| self.directives.unadjust(rel, d.line))
        });
        let Some((path, line)) = mapped else {
            return false;
        };

        log::debug!(
            "Unadjusted {}:{} to {}:{}",
            d.file_path.display(),
            d.line,
            path.display(),
            line
        );
        let original = d.line;
        let shift = |n: usize| (n + line).saturating_sub(original);
        if let Some(range) = &mut d.line_range {
            range.from = shift(range.from);
            range.to = shift(range.to);
        }
        match &mut d.replacement {
            Some(Replacement::Delete(range)) => {
                range.from = shift(range.from);
                range.to = shift(range.to);
            }
            Some(Replacement::Insert { line: at, .. }) => *at = shift(*at),
            None => {}
        }
        d.file_path = path;
        d.line = line;
        true
    }
}

impl Stage for FilenameUnadjuster {
    fn name(&self) -> &str {
        "filename_unadjuster"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.directives.is_empty() {
            return Ok(diagnostics.to_vec());
        }
        let mut remapped = 0;
        let out = transform_diagnostics(diagnostics, |d| {
            if self.unadjust(d) {
                remapped += 1;
            }
        });
        self.remapped += remapped;
        Ok(out)
    }

    fn finish(&mut self) {
        if self.remapped > 0 {
            log::debug!("Mapped {} issues back from //line directives", self.remapped);
        }
    }
}
