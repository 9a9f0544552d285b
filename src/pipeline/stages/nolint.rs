use crate::core::Diagnostic;
use crate::errors::Result;
use crate::io::LineCache;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use crate::registry::LinterRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

static NOLINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*nolint(?::\s*([\w-]+(?:\s*,\s*[\w-]+)*))?(?:\s|$)").unwrap()
});

/// Linters a directive suppresses.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Suppression {
    All,
    Linters(Vec<String>),
}

impl Suppression {
    fn covers(&self, linter: &str) -> bool {
        match self {
            Suppression::All => true,
            Suppression::Linters(names) => names.iter().any(|n| n == linter),
        }
    }
}

/// Suppressions of one file by 1-based line.
type FileSuppressions = HashMap<usize, Suppression>;

/// Drops diagnostics suppressed by a `//nolint[:a,b]` comment.
///
/// A directive trailing code applies to its own line. A directive alone on a
/// line applies to the next line.
pub struct Nolint {
    lines: Arc<LineCache>,
    /// Known names and aliases mapped to canonical linter names.
    names: HashMap<String, String>,
    files: HashMap<PathBuf, Arc<FileSuppressions>>,
    unknown: BTreeSet<String>,
    suppressed: usize,
}

impl Nolint {
    /// `extra` are names outside the registry that may appear in directives,
    /// such as config-declared linters.
    pub fn new<'a>(
        lines: Arc<LineCache>,
        registry: &LinterRegistry,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut names = HashMap::new();
        for lc in registry.all() {
            names.insert(lc.name().to_string(), lc.name().to_string());
            for alias in &lc.alternative_names {
                names.insert(alias.clone(), lc.name().to_string());
            }
        }
        for name in extra {
            names.insert(name.to_string(), name.to_string());
        }
        Self {
            lines,
            names,
            files: HashMap::new(),
            unknown: BTreeSet::new(),
            suppressed: 0,
        }
    }

    fn parse_directive(&mut self, line: &str) -> Option<(Suppression, bool)> {
        let caps = NOLINT.captures(line)?;
        let standalone = line.trim_start().starts_with("//");

        let Some(list) = caps.get(1) else {
            return Some((Suppression::All, standalone));
        };

        let mut linters = Vec::new();
        for name in list.as_str().split(',').map(str::trim) {
            if name == "all" {
                return Some((Suppression::All, standalone));
            }
            match self.names.get(name) {
                Some(canonical) => linters.push(canonical.clone()),
                None => {
                    self.unknown.insert(name.to_string());
                    linters.push(name.to_string());
                }
            }
        }
        Some((Suppression::Linters(linters), standalone))
    }

    fn suppressions(&mut self, d: &Diagnostic) -> Arc<FileSuppressions> {
        if let Some(found) = self.files.get(&d.file_path) {
            return Arc::clone(found);
        }

        let mut suppressions = FileSuppressions::new();
        match self.lines.lines(&d.file_path) {
            Ok(lines) => {
                for (index, text) in lines.iter().enumerate() {
                    if !text.contains("nolint") {
                        continue;
                    }
                    if let Some((suppression, standalone)) = self.parse_directive(text) {
                        let target = if standalone { index + 2 } else { index + 1 };
                        suppressions.insert(target, suppression);
                    }
                }
            }
            Err(e) => log::debug!(
                "Can't read {} for nolint directives: {}",
                d.file_path.display(),
                e
            ),
        }

        let suppressions = Arc::new(suppressions);
        self.files
            .insert(d.file_path.clone(), Arc::clone(&suppressions));
        suppressions
    }

    fn should_pass(&mut self, d: &Diagnostic) -> bool {
        let suppressions = self.suppressions(d);
        let suppressed = suppressions
            .get(&d.line)
            .is_some_and(|s| s.covers(&d.from_linter));
        if suppressed {
            self.suppressed += 1;
        }
        !suppressed
    }
}

impl Stage for Nolint {
    fn name(&self) -> &str {
        "nolint"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        Ok(filter_diagnostics(diagnostics, |d| self.should_pass(d)))
    }

    fn finish(&mut self) {
        if !self.unknown.is_empty() {
            let names: Vec<&str> = self.unknown.iter().map(String::as_str).collect();
            log::warn!(
                "Found unknown linters in //nolint directives: {}",
                names.join(", ")
            );
        }
        if self.suppressed > 0 {
            log::debug!("Suppressed {} issues by //nolint directives", self.suppressed);
        }
    }
}
