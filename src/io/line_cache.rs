//! Read-shared cache of file lines used by several pipeline stages.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Longest line kept by [`read_capped_line`]; longer lines are truncated.
pub const MAX_LINE_BYTES: usize = 512 * 1024;

#[derive(Debug)]
pub struct LineCache {
    root: PathBuf,
    files: RwLock<HashMap<PathBuf, Arc<Vec<String>>>>,
}

impl LineCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a diagnostic path against the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// All lines of `path`, read once per run.
    pub fn lines(&self, path: &Path) -> std::io::Result<Arc<Vec<String>>> {
        if let Some(lines) = self.files.read().get(path) {
            return Ok(Arc::clone(lines));
        }

        let file = std::fs::File::open(self.resolve(path))?;
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        while let Some(line) = read_capped_line(&mut reader, MAX_LINE_BYTES)? {
            lines.push(line.text);
        }

        let lines = Arc::new(lines);
        self.files
            .write()
            .insert(path.to_path_buf(), Arc::clone(&lines));
        Ok(lines)
    }

    /// 1-based line lookup; `Ok(None)` past the end of the file.
    pub fn line(&self, path: &Path, line: usize) -> std::io::Result<Option<String>> {
        if line == 0 {
            return Ok(None);
        }
        Ok(self.lines(path)?.get(line - 1).cloned())
    }

    /// Lines `from..=to`, clamped to the file.
    pub fn range(&self, path: &Path, from: usize, to: usize) -> std::io::Result<Vec<String>> {
        let lines = self.lines(path)?;
        let start = from.saturating_sub(1).min(lines.len());
        let end = to.min(lines.len()).max(start);
        Ok(lines[start..end].to_vec())
    }
}

/// A line read by [`read_capped_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedLine {
    pub text: String,
    /// The line was longer than the cap and lost its tail.
    pub truncated: bool,
}

/// Read one line (without terminator) keeping at most `cap` bytes in memory.
///
/// Returns `Ok(None)` at end of input. Invalid UTF-8 is replaced lossily.
pub fn read_capped_line<R: BufRead>(reader: &mut R, cap: usize) -> std::io::Result<Option<CappedLine>> {
    let mut buf = Vec::new();
    // One byte past the cap tells a line of exactly `cap` bytes from a longer one.
    let read = reader
        .by_ref()
        .take(cap as u64 + 1)
        .read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }

    let mut truncated = false;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() > cap {
        if buf.last() == Some(&b'\r') && reader.fill_buf()?.first() == Some(&b'\n') {
            reader.consume(1);
        } else {
            buf.truncate(cap);
            truncated = true;
            skip_rest_of_line(reader)?;
        }
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    Ok(Some(CappedLine {
        text: String::from_utf8_lossy(&buf).into_owned(),
        truncated,
    }))
}

/// Discard input up to and including the next newline without buffering it.
fn skip_rest_of_line<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
