use crate::core::Diagnostic;
use crate::errors::{compile_regex, Result};
use crate::io::{slash_path, with_path_prefix};
use crate::pipeline::stage::{filter_diagnostics, Stage};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

struct SkipStat {
    pattern: String,
    count: usize,
}

/// Drops diagnostics whose directory matches a skip-dir pattern.
///
/// Runs after path prettification, so patterns see relative paths. A
/// directory passed explicitly as an analysis argument is never skipped, even
/// when a pattern matches it.
pub struct SkipDirs {
    patterns: Vec<Regex>,
    arg_dirs: Vec<PathBuf>,
    path_prefix: String,
    cache: HashMap<PathBuf, bool>,
    skipped: BTreeMap<PathBuf, SkipStat>,
}

impl SkipDirs {
    /// `args` are the analysis arguments relative to `root`; an empty list
    /// means the whole root.
    pub fn new(patterns: &[String], root: &Path, args: &[PathBuf], path_prefix: &str) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| compile_regex(p))
            .collect::<Result<Vec<_>>>()?;

        let mut arg_dirs: Vec<PathBuf> = args
            .iter()
            .map(|arg| {
                if root.join(arg).is_file() {
                    normalize_dir(arg.parent().unwrap_or(Path::new("")))
                } else {
                    normalize_dir(arg)
                }
            })
            .collect();
        if arg_dirs.is_empty() {
            arg_dirs.push(PathBuf::from("."));
        }

        Ok(Self {
            patterns,
            arg_dirs,
            path_prefix: path_prefix.to_string(),
            cache: HashMap::new(),
            skipped: BTreeMap::new(),
        })
    }

    fn should_pass(&mut self, d: &Diagnostic) -> bool {
        if d.file_path.is_absolute() {
            log::debug!(
                "Got abs path {} in skip dirs stage, it should be relative",
                d.file_path.display()
            );
            return true;
        }

        let dir = normalize_dir(d.file_path.parent().unwrap_or(Path::new("")));
        if let Some(&pass) = self.cache.get(&dir) {
            if !pass {
                if let Some(stat) = self.skipped.get_mut(&dir) {
                    stat.count += 1;
                }
            }
            return pass;
        }

        let pass = self.should_pass_dir(&dir);
        self.cache.insert(dir, pass);
        pass
    }

    fn should_pass_dir(&mut self, dir: &Path) -> bool {
        if self.arg_dirs.iter().any(|arg| arg == dir) {
            return true;
        }

        let path = slash_path(&with_path_prefix(&self.path_prefix, dir));
        match self.patterns.iter().find(|p| p.is_match(&path)) {
            Some(pattern) => {
                self.skipped
                    .entry(dir.to_path_buf())
                    .or_insert_with(|| SkipStat {
                        pattern: pattern.as_str().to_string(),
                        count: 0,
                    })
                    .count += 1;
                false
            }
            None => true,
        }
    }
}

/// Directory without `.` components; the root itself is `.`.
fn normalize_dir(dir: &Path) -> PathBuf {
    let normalized: PathBuf = dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

impl Stage for SkipDirs {
    fn name(&self) -> &str {
        "skip_dirs"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.patterns.is_empty() {
            return Ok(diagnostics.to_vec());
        }
        Ok(filter_diagnostics(diagnostics, |d| self.should_pass(d)))
    }

    fn finish(&mut self) {
        for (dir, stat) in &self.skipped {
            log::info!(
                "Skipped {} issues from dir {} by pattern {}",
                stat.count,
                dir.display(),
                stat.pattern
            );
        }
    }
}
