use crate::core::Diagnostic;
use crate::errors::{compile_regex, Result};
use crate::io::{slash_path, with_path_prefix};
use crate::pipeline::stage::{filter_diagnostics, Stage};
use regex::Regex;

/// Drops diagnostics whose file matches a `skip_files` pattern.
pub struct SkipFiles {
    patterns: Vec<Regex>,
    path_prefix: String,
    skipped: usize,
}

impl SkipFiles {
    pub fn new(patterns: &[String], path_prefix: &str) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile_regex(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            path_prefix: path_prefix.to_string(),
            skipped: 0,
        })
    }
}

impl Stage for SkipFiles {
    fn name(&self) -> &str {
        "skip_files"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.patterns.is_empty() {
            return Ok(diagnostics.to_vec());
        }
        let kept = filter_diagnostics(diagnostics, |d| {
            let path = slash_path(&with_path_prefix(&self.path_prefix, &d.file_path));
            !self.patterns.iter().any(|p| p.is_match(&path))
        });
        self.skipped += diagnostics.len() - kept.len();
        Ok(kept)
    }

    fn finish(&mut self) {
        if self.skipped > 0 {
            log::info!("Skipped {} issues by skip_files patterns", self.skipped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_matching_files_with_prefix() {
        let mut stage = SkipFiles::new(&[r"^sub/src/gen_.*\.rs$".to_string()], "sub").unwrap();
        let out = stage
            .process(&[
                Diagnostic::new("src/gen_api.rs", 1, "generated"),
                Diagnostic::new("src/api.rs", 1, "handwritten"),
            ])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "handwritten");
    }

    #[test]
    fn test_slash_patterns_match_backslash_paths() {
        let mut stage = SkipFiles::new(&[r"^src/gen/".to_string()], "").unwrap();
        let out = stage
            .process(&[Diagnostic::new(r"src\gen\api.rs", 1, "generated")])
            .unwrap();
        assert!(out.is_empty());
    }
}
