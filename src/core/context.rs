//! Shared analysis context handed to every linter.
//!
//! The loaded program (`files`, `load_errors`, line directives) is immutable
//! once loaded. [`AnalysisState`] is the mutable scratch area linters may
//! populate; the runner resets it after linters that declare they mutate it.

use crate::errors::Result;
use crate::io::line_cache::LineCache;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One loaded source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the context root.
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Lines without their terminators, 1-based when enumerated with `+ 1`.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// A file that could not be loaded (unreadable or not UTF-8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub path: PathBuf,
    pub line: usize,
    pub message: String,
}

/// Mapping of a `//line FILE:N` directive: from `virtual_start` on, lines of
/// the virtual file correspond to physical lines starting at `physical_start`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineSegment {
    virtual_start: usize,
    physical_file: PathBuf,
    physical_start: usize,
}

/// All `//line` directives found in the loaded files, keyed by virtual file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDirectives {
    segments: HashMap<PathBuf, Vec<LineSegment>>,
}

impl LineDirectives {
    fn record(&mut self, file: &SourceFile) {
        for (idx, line) in file.lines().enumerate() {
            if let Some((virtual_file, virtual_start)) = parse_line_directive(line) {
                self.segments
                    .entry(virtual_file)
                    .or_default()
                    .push(LineSegment {
                        virtual_start,
                        physical_file: file.path.clone(),
                        physical_start: idx + 2,
                    });
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Map a position in a virtual file back to the physical file and line.
    /// `None` when the file is not virtual or the line precedes every directive.
    pub fn unadjust(&self, path: &Path, line: usize) -> Option<(PathBuf, usize)> {
        let segments = self.segments.get(path)?;
        segments
            .iter()
            .filter(|s| s.virtual_start <= line)
            .max_by_key(|s| s.virtual_start)
            .map(|s| {
                (
                    s.physical_file.clone(),
                    s.physical_start + (line - s.virtual_start),
                )
            })
    }
}

/// Type-keyed scratch storage shared by linters within one run.
#[derive(Default)]
pub struct AnalysisState {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl AnalysisState {
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Get the entry of type `T`, creating it with `Default` when missing.
    pub fn entry<T: Any + Send + Sync + Default>(&mut self) -> &mut T {
        self.entries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("entry stored under its own TypeId")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for AnalysisState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisState")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[derive(Debug)]
pub struct AnalysisContext {
    root: PathBuf,
    args: Vec<PathBuf>,
    files: Vec<SourceFile>,
    load_errors: Vec<LoadError>,
    directives: LineDirectives,
    line_cache: Arc<LineCache>,
    state: AnalysisState,
    resets: usize,
}

impl AnalysisContext {
    /// Empty context rooted at `root`; files are added with [`add_file`](Self::add_file).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            line_cache: Arc::new(LineCache::new(root.clone())),
            root,
            args: Vec::new(),
            files: Vec::new(),
            load_errors: Vec::new(),
            directives: LineDirectives::default(),
            state: AnalysisState::default(),
            resets: 0,
        }
    }

    /// Load every file with one of `extensions` below `args` (relative to `root`).
    ///
    /// A trailing `/...` on an argument is accepted and means the same as the
    /// directory itself. With no arguments the whole root is loaded.
    pub fn load(root: impl Into<PathBuf>, args: &[String], extensions: &[String]) -> Result<Self> {
        let mut ctx = Self::new(root);
        let args: Vec<PathBuf> = if args.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            args.iter().map(|a| normalize_arg(a)).collect()
        };

        for arg in &args {
            let start = ctx.root.join(arg);
            if start.is_file() {
                ctx.load_file(&start);
                continue;
            }
            for entry in ignore::WalkBuilder::new(&start).build() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Failed to walk {}: {}", start.display(), e);
                        continue;
                    }
                };
                let path = entry.path();
                if !path.is_file() || !has_extension(path, extensions) {
                    continue;
                }
                ctx.load_file(path);
            }
        }

        ctx.args = args;
        log::debug!(
            "Loaded {} files ({} failed) from {}",
            ctx.files.len(),
            ctx.load_errors.len(),
            ctx.root.display()
        );
        Ok(ctx)
    }

    fn load_file(&mut self, path: &Path) {
        let rel = self.relative(path);
        match std::fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => self.add_file(SourceFile::new(rel, text)),
                Err(e) => self.load_errors.push(LoadError {
                    path: rel,
                    line: 1,
                    message: format!("file is not valid UTF-8: {}", e.utf8_error()),
                }),
            },
            Err(e) => self.load_errors.push(LoadError {
                path: rel,
                line: 1,
                message: format!("can't read file: {}", e),
            }),
        }
    }

    /// Add an already loaded file, recording its `//line` directives.
    pub fn add_file(&mut self, file: SourceFile) {
        self.directives.record(&file);
        self.files.push(file);
    }

    pub fn add_load_error(&mut self, error: LoadError) {
        self.load_errors.push(error);
    }

    pub fn with_args(mut self, args: Vec<PathBuf>) -> Self {
        self.args = args;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Analysis arguments as given, relative to the root.
    pub fn args(&self) -> &[PathBuf] {
        &self.args
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn load_errors(&self) -> &[LoadError] {
        &self.load_errors
    }

    pub fn line_cache(&self) -> Arc<LineCache> {
        Arc::clone(&self.line_cache)
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AnalysisState {
        &mut self.state
    }

    /// Drop everything linters stored in the shared state.
    pub fn reset_state(&mut self) {
        self.state.clear();
        self.resets += 1;
    }

    /// How many times the shared state was reset during this run.
    pub fn reset_count(&self) -> usize {
        self.resets
    }

    pub fn line_directives(&self) -> &LineDirectives {
        &self.directives
    }

    /// See [`LineDirectives::unadjust`].
    pub fn unadjust(&self, path: &Path, line: usize) -> Option<(PathBuf, usize)> {
        self.directives.unadjust(path, line)
    }

    /// Path relative to the root when possible.
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn normalize_arg(arg: &str) -> PathBuf {
    let trimmed = arg.strip_suffix("/...").unwrap_or(arg);
    if trimmed.is_empty() || trimmed == "..." {
        PathBuf::from(".")
    } else {
        PathBuf::from(trimmed)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want == ext))
}

/// Parse `//line FILE:N`.
fn parse_line_directive(line: &str) -> Option<(PathBuf, usize)> {
    let rest = line.trim_start().strip_prefix("//line ")?;
    let (file, number) = rest.trim().rsplit_once(':')?;
    let number = number.parse::<usize>().ok()?;
    if file.is_empty() || number == 0 {
        return None;
    }
    Some((PathBuf::from(file), number))
}
