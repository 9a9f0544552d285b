use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use std::path::{Component, Path, PathBuf};

/// Drops diagnostics located in build output (generated sources under
/// `target/`, build script output) and normalizes `./` path components.
pub struct BuildOutput {
    root: PathBuf,
    dirs: Vec<PathBuf>,
    dropped: usize,
}

impl BuildOutput {
    pub fn new(root: impl Into<PathBuf>, dirs: &[String]) -> Self {
        Self {
            root: root.into(),
            dirs: dirs.iter().map(PathBuf::from).collect(),
            dropped: 0,
        }
    }

    fn is_build_output(&self, path: &Path) -> bool {
        let relative = if path.is_absolute() {
            match path.strip_prefix(&self.root) {
                Ok(rel) => rel,
                Err(_) => return false,
            }
        } else {
            path
        };
        let relative = without_cur_dir(relative);
        self.dirs.iter().any(|dir| relative.starts_with(dir))
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl Stage for BuildOutput {
    fn name(&self) -> &str {
        "build_output"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        let kept = filter_diagnostics(diagnostics, |d| !self.is_build_output(&d.file_path));
        self.dropped += diagnostics.len() - kept.len();
        Ok(kept
            .into_iter()
            .map(|mut d| {
                if !d.file_path.is_absolute() {
                    d.file_path = without_cur_dir(&d.file_path);
                }
                d
            })
            .collect())
    }

    fn finish(&mut self) {
        if self.dropped > 0 {
            log::info!("Dropped {} issues from build output", self.dropped);
        }
    }
}
