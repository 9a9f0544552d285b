use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{filter_diagnostics, Stage};
use crate::pipeline::stages::rules::canonical_linter_name;
use crate::registry::LinterRegistry;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Caps diagnostics per file for linters configured in
/// `issues.max_per_file_from_linter`, keyed by canonical linter name.
/// Disabled in fix mode.
pub struct MaxPerFileFromLinter {
    limits: BTreeMap<String, usize>,
    counts: HashMap<(PathBuf, String), usize>,
}

impl MaxPerFileFromLinter {
    pub fn new(limits: &BTreeMap<String, usize>, registry: &LinterRegistry, fix: bool) -> Self {
        let limits = if fix {
            BTreeMap::new()
        } else {
            limits
                .iter()
                .filter(|(_, limit)| **limit > 0)
                .map(|(name, limit)| (canonical_linter_name(registry, name), *limit))
                .collect()
        };
        Self {
            limits,
            counts: HashMap::new(),
        }
    }
}

impl Stage for MaxPerFileFromLinter {
    fn name(&self) -> &str {
        "max_per_file_from_linter"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        if self.limits.is_empty() {
            return Ok(diagnostics.to_vec());
        }
        Ok(filter_diagnostics(diagnostics, |d| {
            let Some(&limit) = self.limits.get(&d.from_linter) else {
                return true;
            };
            let count = self
                .counts
                .entry((d.file_path.clone(), d.from_linter.clone()))
                .or_insert(0);
            *count += 1;
            *count <= limit
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linters::builtin_registry;

    fn cap(limits: &[(&str, usize)], fix: bool) -> MaxPerFileFromLinter {
        let limits = limits
            .iter()
            .map(|(name, limit)| (name.to_string(), *limit))
            .collect();
        MaxPerFileFromLinter::new(&limits, &builtin_registry(&Default::default()), fix)
    }

    fn input() -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for file in ["a.rs", "b.rs"] {
            for line in 1..=3 {
                out.push(Diagnostic::new(file, line, "blank").with_linter("blanklines"));
                out.push(Diagnostic::new(file, line, "long").with_linter("lll"));
            }
        }
        out
    }

    #[test]
    fn test_caps_configured_linters_per_file() {
        let out = cap(&[("blanklines", 1)], false)
            .process(&input())
            .unwrap();
        assert_eq!(out.iter().filter(|d| d.from_linter == "blanklines").count(), 2);
        assert_eq!(out.iter().filter(|d| d.from_linter == "lll").count(), 6);
    }

    #[test]
    fn test_disabled_in_fix_mode() {
        let out = cap(&[("blanklines", 1)], true)
            .process(&input())
            .unwrap();
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn test_limit_keyed_by_alias() {
        let out = cap(&[("whitespace", 1), ("line-length", 2)], false)
            .process(&input())
            .unwrap();
        assert_eq!(out.iter().filter(|d| d.from_linter == "blanklines").count(), 2);
        assert_eq!(out.iter().filter(|d| d.from_linter == "lll").count(), 4);
    }
}
