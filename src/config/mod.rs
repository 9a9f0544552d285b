//! Configuration model, loaded from `.lintmux.toml` and extended by CLI flags.
//!
//! Every section has serde defaults, so a partial file (or none at all) is a
//! valid configuration.

pub mod loader;
pub mod validation;

pub use loader::{find_config_file, load_config, parse_config, CONFIG_FILE_NAME};
pub use validation::{validate_config, validate_linters_config};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Directory patterns skipped unless `skip_dirs_use_default` is turned off.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    r"(^|/)vendor($|/)",
    r"(^|/)third_party($|/)",
    r"(^|/)testdata($|/)",
    r"(^|/)examples($|/)",
    r"(^|/)target($|/)",
];

/// Root configuration structure for lintmux
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub linters: LintersConfig,
    pub linters_settings: LintersSettings,
    pub issues: IssuesConfig,
    pub severity: SeverityConfig,
    pub output: OutputConfig,
}

/// What gets loaded and which paths are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Regexes matched against the directory of each diagnostic
    pub skip_dirs: Vec<String>,

    /// Also skip [`DEFAULT_SKIP_DIRS`]
    pub skip_dirs_use_default: bool,

    /// Regexes matched against the file path of each diagnostic
    pub skip_files: Vec<String>,

    /// Build output directories; diagnostics inside them are dropped
    pub build_dirs: Vec<String>,

    /// File extensions to load (without the dot)
    pub extensions: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            skip_dirs: Vec::new(),
            skip_dirs_use_default: true,
            skip_files: Vec::new(),
            build_dirs: vec!["target".to_string()],
            extensions: ["rs", "go", "c", "h", "cc", "cpp", "py", "js", "ts"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl RunConfig {
    /// User skip-dir patterns followed by the defaults, when enabled.
    pub fn effective_skip_dirs(&self) -> Vec<String> {
        let mut patterns = self.skip_dirs.clone();
        if self.skip_dirs_use_default {
            patterns.extend(DEFAULT_SKIP_DIRS.iter().map(|p| p.to_string()));
        }
        patterns
    }
}

/// Linter selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintersConfig {
    pub enable: Vec<String>,
    pub disable: Vec<String>,
    pub presets: Vec<String>,
    pub enable_all: bool,
    pub disable_all: bool,
    /// Drop slow linters from the preset/default selection
    pub fast: bool,
    /// External linters, keyed by the name they report under
    pub custom: BTreeMap<String, CustomLinterSettings>,
}

/// Declaration of a linter loaded through a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomLinterSettings {
    /// Provider id, e.g. `regex`
    pub provider: String,
    pub description: String,
    /// Provider specific: the pattern searched for by the `regex` provider
    pub pattern: Option<String>,
    /// Provider specific: message template (`$0`, `$1`... expand to captures)
    pub message: Option<String>,
    pub presets: Vec<String>,
    pub slow: bool,
    pub url: Option<String>,
}

/// Per-linter settings of the built-in linters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintersSettings {
    pub lll: LllSettings,
    pub godox: GodoxSettings,
    pub dupl: DuplSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LllSettings {
    pub line_length: usize,
    /// Width a tab counts for
    pub tab_width: usize,
}

impl Default for LllSettings {
    fn default() -> Self {
        Self {
            line_length: 120,
            tab_width: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GodoxSettings {
    pub keywords: Vec<String>,
}

impl Default for GodoxSettings {
    fn default() -> Self {
        Self {
            keywords: vec!["TODO".into(), "BUG".into(), "FIXME".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplSettings {
    /// Minimum number of identical non-blank lines reported as a duplicate
    pub threshold: usize,
}

impl Default for DuplSettings {
    fn default() -> Self {
        Self { threshold: 15 }
    }
}

/// Conditions shared by exclude and severity rules. Set conditions must all
/// match for the rule to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRule {
    pub linters: Vec<String>,
    pub path: Option<String>,
    pub path_except: Option<String>,
    pub text: Option<String>,
    pub source: Option<String>,
}

impl BaseRule {
    /// Number of conditions set.
    pub fn condition_count(&self) -> usize {
        usize::from(!self.linters.is_empty())
            + usize::from(self.path.is_some())
            + usize::from(self.path_except.is_some())
            + usize::from(self.text.is_some())
            + usize::from(self.source.is_some())
    }

    /// Every regex of the rule, for validation.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        [&self.path, &self.path_except, &self.text, &self.source]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeRule {
    #[serde(flatten)]
    pub rule: BaseRule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityRule {
    #[serde(default)]
    pub severity: String,
    #[serde(flatten)]
    pub rule: BaseRule,
}

/// Diagnostic filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuesConfig {
    /// Message regexes; matching diagnostics are dropped
    pub exclude: Vec<String>,
    pub exclude_case_sensitive: bool,
    pub exclude_rules: Vec<ExcludeRule>,

    /// Path regexes exempt from generated-file exclusion
    pub include_paths: Vec<String>,

    pub uniq_by_line: bool,

    /// 0 means unlimited
    pub max_issues_per_linter: usize,
    /// 0 means unlimited
    pub max_same_issues: usize,
    pub max_per_file_from_linter: BTreeMap<String, usize>,

    /// Only report diagnostics on lines changed against `HEAD`
    pub new: bool,
    pub new_from_rev: Option<String>,
    pub new_from_patch: Option<PathBuf>,
    /// In diff mode, keep every diagnostic of a changed file
    pub whole_files: bool,

    /// Apply suggested fixes to the source files
    pub fix: bool,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            exclude_case_sensitive: false,
            exclude_rules: Vec::new(),
            include_paths: Vec::new(),
            uniq_by_line: true,
            max_issues_per_linter: 50,
            max_same_issues: 3,
            max_per_file_from_linter: BTreeMap::new(),
            new: false,
            new_from_rev: None,
            new_from_patch: None,
            whole_files: false,
            fix: false,
        }
    }
}

impl IssuesConfig {
    /// Whether only diagnostics on changed lines are kept.
    pub fn diff_mode(&self) -> bool {
        self.new || self.new_from_rev.is_some() || self.new_from_patch.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    /// Severity of diagnostics no rule matches
    pub default: String,
    pub case_sensitive: bool,
    /// Keep a severity a linter already set instead of overriding it
    pub keep_linter_severity: bool,
    pub rules: Vec<SeverityRule>,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            default: "error".to_string(),
            case_sensitive: false,
            keep_linter_severity: false,
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix added to every reported path
    pub path_prefix: String,
    pub format: OutputFormat,
}
