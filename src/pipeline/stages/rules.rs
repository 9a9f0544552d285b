//! Matching of user rules shared by `exclude_rules` and `severity`.

use crate::config::BaseRule;
use crate::core::Diagnostic;
use crate::errors::{compile_regex, Result};
use crate::io::{slash_path, with_path_prefix, LineCache};
use crate::registry::LinterRegistry;
use regex::Regex;
use std::sync::Arc;

/// A compiled [`BaseRule`]: every condition it sets must hold.
#[derive(Debug)]
pub struct RuleMatcher {
    linters: Vec<String>,
    path: Option<Regex>,
    path_except: Option<Regex>,
    text: Option<Regex>,
    source: Option<Regex>,
}

fn compile(pattern: &Option<String>, case_sensitive: bool) -> Result<Option<Regex>> {
    let Some(pattern) = pattern else {
        return Ok(None);
    };
    if case_sensitive {
        compile_regex(pattern).map(Some)
    } else {
        compile_regex(&format!("(?i){pattern}")).map(Some)
    }
}

/// Canonical name of a linter named in the configuration. Diagnostics carry
/// canonical names only; names the registry doesn't know (custom linters)
/// are kept as written.
pub fn canonical_linter_name(registry: &LinterRegistry, name: &str) -> String {
    registry.canonical_name(name).unwrap_or(name).to_string()
}

impl RuleMatcher {
    pub fn new(rule: &BaseRule, case_sensitive: bool, registry: &LinterRegistry) -> Result<Self> {
        Ok(Self {
            linters: rule
                .linters
                .iter()
                .map(|name| canonical_linter_name(registry, name))
                .collect(),
            path: compile(&rule.path, case_sensitive)?,
            path_except: compile(&rule.path_except, case_sensitive)?,
            text: compile(&rule.text, case_sensitive)?,
            source: compile(&rule.source, case_sensitive)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.linters.is_empty()
            && self.path.is_none()
            && self.path_except.is_none()
            && self.text.is_none()
            && self.source.is_none()
    }

    pub fn matches(&self, d: &Diagnostic, files: &RuleFiles) -> bool {
        if self.is_empty() {
            return false;
        }
        if !self.linters.is_empty() && !self.linters.iter().any(|l| *l == d.from_linter) {
            return false;
        }
        if self.path.is_some() || self.path_except.is_some() {
            let path = files.display_path(d);
            if let Some(path_re) = &self.path {
                if !path_re.is_match(&path) {
                    return false;
                }
            }
            if let Some(except) = &self.path_except {
                if except.is_match(&path) {
                    return false;
                }
            }
        }
        if let Some(text) = &self.text {
            if !text.is_match(&d.message) {
                return false;
            }
        }
        if let Some(source) = &self.source {
            match files.source_line(d) {
                Some(line) if source.is_match(&line) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Path and source access for rule matching. Rules run before the path
/// prefixer, so the configured prefix is applied here.
#[derive(Debug, Clone)]
pub struct RuleFiles {
    lines: Arc<LineCache>,
    path_prefix: String,
}

impl RuleFiles {
    pub fn new(lines: Arc<LineCache>, path_prefix: &str) -> Self {
        Self {
            lines,
            path_prefix: path_prefix.to_string(),
        }
    }

    fn display_path(&self, d: &Diagnostic) -> String {
        slash_path(&with_path_prefix(&self.path_prefix, &d.file_path))
    }

    fn source_line(&self, d: &Diagnostic) -> Option<String> {
        if let Some(line) = d.source_lines.first() {
            return Some(line.clone());
        }
        match self.lines.line(&d.file_path, d.line) {
            Ok(line) => line,
            Err(e) => {
                log::debug!(
                    "Can't read source line {} of {}: {}",
                    d.line,
                    d.file_path.display(),
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linters::builtin_registry;
    use std::fs;
    use tempfile::TempDir;

    fn rule(linters: &[&str], path: Option<&str>, text: Option<&str>) -> BaseRule {
        BaseRule {
            linters: linters.iter().map(|s| s.to_string()).collect(),
            path: path.map(String::from),
            text: text.map(String::from),
            ..Default::default()
        }
    }

    fn files(root: &std::path::Path) -> RuleFiles {
        RuleFiles::new(Arc::new(LineCache::new(root)), "")
    }

    fn matcher(rule: &BaseRule, case_sensitive: bool) -> RuleMatcher {
        RuleMatcher::new(rule, case_sensitive, &builtin_registry(&Default::default())).unwrap()
    }

    #[test]
    fn test_all_conditions_must_match() {
        let files = files(std::path::Path::new("/nonexistent"));
        let matcher = matcher(&rule(&["lll"], Some(r"_test\.rs$"), None), false);

        let hit = Diagnostic::new("src/a_test.rs", 1, "long").with_linter("lll");
        let other_linter = Diagnostic::new("src/a_test.rs", 1, "long").with_linter("godox");
        let other_path = Diagnostic::new("src/a.rs", 1, "long").with_linter("lll");

        assert!(matcher.matches(&hit, &files));
        assert!(!matcher.matches(&other_linter, &files));
        assert!(!matcher.matches(&other_path, &files));
    }

    #[test]
    fn test_text_case_sensitivity() {
        let files = files(std::path::Path::new("/nonexistent"));
        let d = Diagnostic::new("a.rs", 1, "Line contains TODO").with_linter("godox");

        let insensitive = matcher(&rule(&[], None, Some("todo")), false);
        let sensitive = matcher(&rule(&[], None, Some("todo")), true);
        assert!(insensitive.matches(&d, &files));
        assert!(!sensitive.matches(&d, &files));
    }

    #[test]
    fn test_path_except_and_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}\nlet x = legacy_call();\n").unwrap();
        let files = files(dir.path());

        let base = BaseRule {
            path_except: Some(r"^vendor/".into()),
            source: Some(r"legacy_\w+".into()),
            ..Default::default()
        };
        let matcher = matcher(&base, false);

        assert!(matcher.matches(&Diagnostic::new("a.rs", 2, "x"), &files));
        assert!(!matcher.matches(&Diagnostic::new("a.rs", 1, "x"), &files));
        assert!(!matcher.matches(&Diagnostic::new("vendor/a.rs", 2, "x"), &files));
    }

    #[test]
    fn test_linter_alias_matches_canonical_name() {
        let files = files(std::path::Path::new("/nonexistent"));
        let matcher = matcher(&rule(&["todo"], None, None), false);

        assert!(matcher.matches(&Diagnostic::new("a.rs", 1, "x").with_linter("godox"), &files));
        assert!(!matcher.matches(&Diagnostic::new("a.rs", 1, "x").with_linter("lll"), &files));
    }

    #[test]
    fn test_unknown_linter_names_kept_as_written() {
        let registry = builtin_registry(&Default::default());
        assert_eq!(canonical_linter_name(&registry, "line-length"), "lll");
        assert_eq!(canonical_linter_name(&registry, "no-println"), "no-println");
    }

    #[test]
    fn test_path_patterns_match_backslash_paths() {
        let files = files(std::path::Path::new("/nonexistent"));
        let matcher = matcher(&rule(&[], Some("^vendor/lib/"), None), false);

        let d = Diagnostic::new(r"vendor\lib\a.rs", 1, "x");
        assert!(matcher.matches(&d, &files));
    }
}
