use crate::core::Diagnostic;
use crate::errors::Result;
use crate::io::with_path_prefix;
use crate::pipeline::stage::{transform_diagnostics, Stage};

/// Adds the configured output prefix to every path.
pub struct PathPrefixer {
    prefix: String,
}

impl PathPrefixer {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl Stage for PathPrefixer {
    fn name(&self) -> &str {
        "path_prefixer"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.prefix.is_empty() {
            return Ok(diagnostics.to_vec());
        }
        Ok(transform_diagnostics(diagnostics, |d| {
            d.file_path = with_path_prefix(&self.prefix, &d.file_path);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_prefixes_paths() {
        let out = PathPrefixer::new("crates/core")
            .process(&[Diagnostic::new("src/a.rs", 1, "x")])
            .unwrap();
        assert_eq!(out[0].file_path, PathBuf::from("crates/core/src/a.rs"));
    }
}
