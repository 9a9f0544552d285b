use crate::core::Diagnostic;
use crate::errors::{Error, Result};
use crate::io::ChangedLines;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use std::path::PathBuf;

/// Where changed lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// Working tree against `HEAD` or the given revision.
    Git {
        root: PathBuf,
        revision: Option<String>,
    },
    /// A unified diff file.
    Patch(PathBuf),
}

enum Changes {
    Pending(DiffSource),
    Loaded(ChangedLines),
    Failed(String),
}

/// Keeps only diagnostics on changed lines.
///
/// Changes are loaded on first use. When they cannot be loaded the stage
/// fails and the pipeline keeps every diagnostic.
pub struct Diff {
    changes: Changes,
    whole_files: bool,
    hidden: usize,
}

impl Diff {
    pub fn new(source: DiffSource, whole_files: bool) -> Self {
        Self {
            changes: Changes::Pending(source),
            whole_files,
            hidden: 0,
        }
    }

    pub fn with_changes(changes: ChangedLines, whole_files: bool) -> Self {
        Self {
            changes: Changes::Loaded(changes),
            whole_files,
            hidden: 0,
        }
    }

    fn load(source: &DiffSource) -> Result<ChangedLines> {
        match source {
            DiffSource::Git { root, revision } => {
                ChangedLines::from_git(root, revision.as_deref())
            }
            DiffSource::Patch(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::stage("diff", format!("can't read patch {}: {e}", path.display()))
                })?;
                Ok(ChangedLines::parse(&text))
            }
        }
    }

    fn changes(&mut self) -> Result<&ChangedLines> {
        if let Changes::Pending(source) = &self.changes {
            self.changes = match Self::load(source) {
                Ok(changed) => {
                    log::info!("Diff mode: {} changed files", changed.file_count());
                    Changes::Loaded(changed)
                }
                Err(e) => Changes::Failed(e.to_string()),
            };
        }
        match &self.changes {
            Changes::Loaded(changed) => Ok(changed),
            Changes::Failed(message) => Err(Error::stage("diff", message)),
            Changes::Pending(_) => Err(Error::stage("diff", "changes were not loaded")),
        }
    }
}

impl Stage for Diff {
    fn name(&self) -> &str {
        "diff"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        let whole_files = self.whole_files;
        let changed = self.changes()?;
        let kept = filter_diagnostics(diagnostics, |d| {
            if whole_files {
                return changed.contains_file(&d.file_path);
            }
            let lines = d.lines();
            changed.touches(&d.file_path, lines.from, lines.to)
        });
        self.hidden += diagnostics.len() - kept.len();
        Ok(kept)
    }

    fn finish(&mut self) {
        if self.hidden > 0 {
            log::info!("{} issues on unchanged lines were hidden", self.hidden);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const PATCH: &str = indoc! {"
        --- a/src/a.rs
        +++ b/src/a.rs
        @@ -10,2 +10,3 @@
         keep();
        +added();
         keep();
    "};

    fn input() -> Vec<Diagnostic> {
        vec![
            Diagnostic::new("src/a.rs", 11, "on changed line"),
            Diagnostic::new("src/a.rs", 2, "old code"),
            Diagnostic::new("src/b.rs", 11, "untouched file"),
        ]
    }

    #[test]
    fn test_keeps_changed_lines_only() {
        let mut stage = Diff::with_changes(ChangedLines::parse(PATCH), false);
        let out = stage.process(&input()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "on changed line");
    }

    #[test]
    fn test_whole_files() {
        let mut stage = Diff::with_changes(ChangedLines::parse(PATCH), true);
        let out = stage.process(&input()).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_unreadable_patch_fails() {
        let mut stage = Diff::new(DiffSource::Patch("/nonexistent/x.patch".into()), false);
        assert!(stage.process(&input()).is_err());
        assert!(stage.process(&input()).is_err());
    }
}
