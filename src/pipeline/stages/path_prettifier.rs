use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{transform_diagnostics, Stage};
use std::path::{Path, PathBuf};

/// Rewrites absolute paths relative to the working directory when that is
/// shorter. Later stages match user patterns against these relative paths.
pub struct PathPrettifier {
    root: PathBuf,
}

impl PathPrettifier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn prettify(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_absolute() {
            return None;
        }
        let relative = pathdiff::diff_paths(path, &self.root)?;
        (relative.as_os_str().len() < path.as_os_str().len()).then_some(relative)
    }
}

impl Stage for PathPrettifier {
    fn name(&self) -> &str {
        "path_prettifier"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        Ok(transform_diagnostics(diagnostics, |d| {
            if let Some(relative) = self.prettify(&d.file_path) {
                d.file_path = relative;
            }
        }))
    }
}
