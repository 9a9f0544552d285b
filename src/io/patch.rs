//! Changed-line sets for the "only new issues" mode.
//!
//! Lines come either from a unified diff (a patch file) or from git, where
//! the working tree is compared against `HEAD` or a given revision.

use crate::errors::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Added or modified lines per file, 1-based in the new version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedLines {
    files: HashMap<PathBuf, BTreeSet<usize>>,
}

impl ChangedLines {
    /// Parse a unified diff. Deleted files are ignored.
    pub fn parse(patch: &str) -> Self {
        let mut changed = ChangedLines::default();
        let mut current: Option<PathBuf> = None;
        let mut new_line = 0usize;
        let mut old_remaining = 0usize;
        let mut new_remaining = 0usize;

        for line in patch.lines() {
            if old_remaining > 0 || new_remaining > 0 {
                match line.as_bytes().first() {
                    Some(b'+') => {
                        if let Some(path) = &current {
                            changed.files.entry(path.clone()).or_default().insert(new_line);
                        }
                        new_line += 1;
                        new_remaining = new_remaining.saturating_sub(1);
                    }
                    Some(b'-') => old_remaining = old_remaining.saturating_sub(1),
                    Some(b'\\') => {}
                    _ => {
                        new_line += 1;
                        old_remaining = old_remaining.saturating_sub(1);
                        new_remaining = new_remaining.saturating_sub(1);
                    }
                }
                continue;
            }

            if let Some(target) = line.strip_prefix("+++ ") {
                current = parse_target(target);
                if let Some(path) = &current {
                    changed.files.entry(path.clone()).or_default();
                }
            } else if line.starts_with("@@") {
                if let Some((old_count, new_start, new_count)) = parse_hunk_header(line) {
                    old_remaining = old_count;
                    new_line = new_start;
                    new_remaining = new_count;
                }
            }
        }

        changed
    }

    /// Changes of the git working tree (index included) against `revision`,
    /// `HEAD` when not given. Untracked files count as entirely changed.
    pub fn from_git(root: &Path, revision: Option<&str>) -> Result<Self> {
        let repo = git2::Repository::discover(root)?;
        let tree = repo
            .revparse_single(revision.unwrap_or("HEAD"))?
            .peel_to_tree()?;

        let mut opts = git2::DiffOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .show_untracked_content(true);
        let diff = repo.diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))?;

        let mut text = String::new();
        diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
            let content = String::from_utf8_lossy(line.content());
            match line.origin() {
                '+' | '-' | ' ' => {
                    text.push(line.origin());
                    text.push_str(&content);
                }
                'F' | 'H' => text.push_str(&content),
                _ => return true,
            }
            if !text.ends_with('\n') {
                text.push('\n');
            }
            true
        })?;

        let changed = Self::parse(&text);
        let Some(workdir) = repo.workdir() else {
            return Ok(changed);
        };
        Ok(changed.rebase(workdir, root))
    }

    /// Re-express repository-relative paths relative to `root`.
    fn rebase(self, workdir: &Path, root: &Path) -> Self {
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let files = self
            .files
            .into_iter()
            .filter_map(|(path, lines)| {
                let absolute = workdir.join(&path);
                absolute
                    .strip_prefix(&root)
                    .ok()
                    .map(|rel| (rel.to_path_buf(), lines))
            })
            .collect();
        Self { files }
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Whether any line of `from..=to` in `path` changed.
    pub fn touches(&self, path: &Path, from: usize, to: usize) -> bool {
        self.files
            .get(path)
            .is_some_and(|lines| lines.range(from..=to).next().is_some())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

fn parse_target(target: &str) -> Option<PathBuf> {
    let target = target.split('\t').next().unwrap_or(target).trim();
    if target == "/dev/null" {
        return None;
    }
    let path = target.strip_prefix("b/").unwrap_or(target);
    Some(PathBuf::from(path))
}

/// `@@ -a[,b] +c[,d] @@` → (b, c, d); missing counts default to 1.
fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize)> {
    let mut parts = line.split_whitespace().skip(1);
    let old = parts.next()?.strip_prefix('-')?;
    let new = parts.next()?.strip_prefix('+')?;

    let count = |spec: &str| -> Option<(usize, usize)> {
        match spec.split_once(',') {
            Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
            None => Some((spec.parse().ok()?, 1)),
        }
    };
    let (_, old_count) = count(old)?;
    let (new_start, new_count) = count(new)?;
    Some((old_count, new_start, new_count))
}
