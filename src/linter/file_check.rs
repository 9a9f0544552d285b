//! Linters made of independent per-file checks.

use super::Linter;
use crate::core::{AnalysisContext, Diagnostic, SourceFile};
use rayon::prelude::*;
use std::sync::Arc;

/// One check applied to each file on its own.
pub trait FileCheck: Send + Sync {
    /// Linter name diagnostics of this check are attributed to.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn check(&self, file: &SourceFile) -> Vec<Diagnostic>;
}

/// Runs a set of [`FileCheck`]s in a single parallel pass over the files.
///
/// A linter with one check is an ordinary linter; with several it is the
/// composite produced by the resolver's optimization.
pub struct FileCheckLinter {
    name: String,
    description: String,
    checks: Vec<Arc<dyn FileCheck>>,
}

impl FileCheckLinter {
    pub fn single(check: Arc<dyn FileCheck>) -> Self {
        Self {
            name: check.name().to_string(),
            description: check.description().to_string(),
            checks: vec![check],
        }
    }

    pub fn composite(
        name: impl Into<String>,
        description: impl Into<String>,
        checks: Vec<Arc<dyn FileCheck>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            checks,
        }
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }
}

impl Linter for FileCheckLinter {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn run(&self, ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
        let diagnostics = ctx
            .files()
            .par_iter()
            .flat_map_iter(|file| {
                self.checks.iter().flat_map(move |check| {
                    check.check(file).into_iter().map(move |mut d| {
                        if d.from_linter.is_empty() {
                            d.from_linter = check.name().to_string();
                        }
                        d
                    })
                })
            })
            .collect();
        Ok(diagnostics)
    }

    fn file_checks(&self) -> Option<Vec<Arc<dyn FileCheck>>> {
        Some(self.checks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LongFile;

    impl FileCheck for LongFile {
        fn name(&self) -> &str {
            "longfile"
        }

        fn description(&self) -> &str {
            "Reports files with more than two lines"
        }

        fn check(&self, file: &SourceFile) -> Vec<Diagnostic> {
            if file.line_count() > 2 {
                vec![Diagnostic::new(&file.path, 3, "file is too long")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_checks_are_stamped_with_their_name() {
        let mut ctx = AnalysisContext::new("/tmp/project");
        ctx.add_file(SourceFile::new("a.rs", "1\n2\n3\n"));
        ctx.add_file(SourceFile::new("b.rs", "1\n"));

        let linter = FileCheckLinter::composite("composite", "all", vec![Arc::new(LongFile)]);
        let diagnostics = linter.run(&mut ctx).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].from_linter, "longfile");
        assert_eq!(linter.check_names(), vec!["longfile"]);
    }

    #[test]
    fn test_single_takes_check_identity() {
        let linter = FileCheckLinter::single(Arc::new(LongFile));
        assert_eq!(linter.name(), "longfile");
        assert!(linter.file_checks().is_some());
    }
}
