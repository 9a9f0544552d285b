//! Applies suggested replacements to source files.
//!
//! Fixes are grouped per file and written in one rewrite under that file's
//! lock; files are fixed in parallel. Within a file, edits are applied from
//! the bottom up so earlier line numbers stay valid.

use crate::core::{Diagnostic, Replacement};
use crate::errors::{Error, Result};
use crate::pipeline::stage::Stage;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Outcome of fixing one file.
struct FileFix {
    path: PathBuf,
    /// Indices of diagnostics whose fix was written.
    applied: Vec<usize>,
    overlapping: usize,
    error: Option<Error>,
}

pub struct Fixer {
    root: PathBuf,
    enabled: bool,
    locks: Mutex<HashMap<PathBuf, std::sync::Arc<Mutex<()>>>>,
    fixed: usize,
    fixed_files: usize,
    failed_files: usize,
}

impl Fixer {
    pub fn new(root: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            root: root.into(),
            enabled,
            locks: Mutex::new(HashMap::new()),
            fixed: 0,
            fixed_files: 0,
            failed_files: 0,
        }
    }

    fn file_lock(&self, path: &Path) -> std::sync::Arc<Mutex<()>> {
        std::sync::Arc::clone(self.locks.lock().entry(path.to_path_buf()).or_default())
    }

    fn fix_file(&self, path: &Path, mut indices: Vec<usize>, diagnostics: &[Diagnostic]) -> FileFix {
        indices.sort_by_key(|&i| (span_of(&diagnostics[i]).from, i));

        let mut selected: Vec<usize> = Vec::with_capacity(indices.len());
        let mut overlapping = 0;
        let mut last_to: Option<usize> = None;
        for i in indices {
            let span = span_of(&diagnostics[i]);
            if last_to.is_some_and(|to| span.from <= to) {
                log::debug!(
                    "Skipping fix of {} overlapping an earlier fix",
                    diagnostics[i].position()
                );
                overlapping += 1;
                continue;
            }
            last_to = Some(span.to);
            selected.push(i);
        }

        let edits: Vec<&Replacement> = selected
            .iter()
            .filter_map(|&i| diagnostics[i].replacement.as_ref())
            .collect();

        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let lock = self.file_lock(&full);
        let _guard = lock.lock();

        let result = std::fs::read_to_string(&full)
            .map_err(|e| Error::fix(path, e))
            .and_then(|text| apply_edits(&text, &edits).map_err(|e| Error::fix(path, e)))
            .and_then(|fixed| std::fs::write(&full, fixed).map_err(|e| Error::fix(path, e)));

        match result {
            Ok(()) => FileFix {
                path: path.to_path_buf(),
                applied: selected,
                overlapping,
                error: None,
            },
            Err(e) => FileFix {
                path: path.to_path_buf(),
                applied: Vec::new(),
                overlapping,
                error: Some(e),
            },
        }
    }
}

fn span_of(d: &Diagnostic) -> crate::core::LineRange {
    d.replacement
        .as_ref()
        .map(Replacement::span)
        .unwrap_or_else(|| d.lines())
}

/// Apply non-overlapping edits sorted by position. The text outside the
/// edited lines, line endings included, is kept byte for byte.
pub fn apply_edits(text: &str, edits: &[&Replacement]) -> std::result::Result<String, String> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();

    for edit in edits.iter().rev() {
        match edit {
            Replacement::Delete(range) => {
                if range.from == 0 || range.to < range.from || range.to > lines.len() {
                    return Err(format!(
                        "line range {}-{} is out of file with {} lines",
                        range.from,
                        range.to,
                        lines.len()
                    ));
                }
                lines.drain(range.from - 1..range.to);
            }
            Replacement::Insert { line, column, text } => {
                if *line == lines.len() + 1 {
                    lines.push(text.clone());
                    continue;
                }
                if *line == 0 || *line > lines.len() {
                    return Err(format!(
                        "line {} is out of file with {} lines",
                        line,
                        lines.len()
                    ));
                }
                let target = &mut lines[*line - 1];
                let body = target.trim_end_matches(['\n', '\r']);
                let offset = column.saturating_sub(1);
                let byte = if offset == body.chars().count() {
                    Some(body.len())
                } else {
                    body.char_indices().nth(offset).map(|(i, _)| i)
                };
                let Some(byte) = byte else {
                    return Err(format!("column {} is out of line {}", column, line));
                };
                target.insert_str(byte, text);
            }
        }
    }

    Ok(lines.concat())
}

impl Stage for Fixer {
    fn name(&self) -> &str {
        "fixer"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if !self.enabled {
            return Ok(diagnostics.to_vec());
        }

        let mut by_file: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
        for (i, d) in diagnostics.iter().enumerate() {
            if d.replacement.is_some() {
                by_file.entry(d.file_path.clone()).or_default().push(i);
            }
        }
        if by_file.is_empty() {
            return Ok(diagnostics.to_vec());
        }

        let this = &*self;
        let results: Vec<FileFix> = by_file
            .into_par_iter()
            .map(|(path, indices)| this.fix_file(&path, indices, diagnostics))
            .collect();

        let mut applied = HashSet::new();
        for result in results {
            if let Some(error) = result.error {
                log::error!("{}", error);
                self.failed_files += 1;
                continue;
            }
            if result.overlapping > 0 {
                log::warn!(
                    "Skipped {} overlapping fixes in {}",
                    result.overlapping,
                    result.path.display()
                );
            }
            if !result.applied.is_empty() {
                self.fixed_files += 1;
                self.fixed += result.applied.len();
            }
            applied.extend(result.applied);
        }

        Ok(diagnostics
            .iter()
            .enumerate()
            .filter(|(i, _)| !applied.contains(i))
            .map(|(_, d)| d.clone())
            .collect())
    }

    fn finish(&mut self) {
        if self.fixed > 0 {
            log::info!("Fixed {} issues in {} files", self.fixed, self.fixed_files);
        }
        if self.failed_files > 0 {
            log::warn!("Failed to fix issues in {} files", self.failed_files);
        }
    }
}
