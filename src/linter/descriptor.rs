use super::Linter;
use crate::registry::presets::Preset;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// How much of the program a linter needs loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// File text only
    #[default]
    Syntax,
    /// Per-file semantic information
    TypesInfo,
    /// Every file at once; never merged into a composite
    WholeProgram,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    pub since: String,
    pub message: String,
    pub replacement: Option<String>,
}

/// Descriptor of a known linter: identity, preset membership and the flags
/// the resolver and runner act on.
#[derive(Clone)]
pub struct LinterConfig {
    pub linter: Arc<dyn Linter>,
    pub enabled_by_default: bool,
    pub presets: Vec<Preset>,
    pub alternative_names: Vec<String>,
    pub is_slow: bool,
    /// The runner resets the shared analysis state after running this linter.
    pub mutates_shared_state: bool,
    pub load_mode: LoadMode,
    pub deprecation: Option<Deprecation>,
    pub url: Option<String>,
}

impl LinterConfig {
    pub fn new(linter: Arc<dyn Linter>) -> Self {
        Self {
            linter,
            enabled_by_default: false,
            presets: Vec::new(),
            alternative_names: Vec::new(),
            is_slow: false,
            mutates_shared_state: false,
            load_mode: LoadMode::Syntax,
            deprecation: None,
            url: None,
        }
    }

    pub fn name(&self) -> &str {
        self.linter.name()
    }

    pub fn with_enabled_by_default(mut self) -> Self {
        self.enabled_by_default = true;
        self
    }

    pub fn with_presets(mut self, presets: &[Preset]) -> Self {
        self.presets.extend_from_slice(presets);
        self
    }

    pub fn with_alternative_names(mut self, names: &[&str]) -> Self {
        self.alternative_names
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn with_slow(mut self) -> Self {
        self.is_slow = true;
        self
    }

    pub fn with_mutates_shared_state(mut self) -> Self {
        self.mutates_shared_state = true;
        self
    }

    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn deprecated(
        mut self,
        since: impl Into<String>,
        message: impl Into<String>,
        replacement: Option<&str>,
    ) -> Self {
        self.deprecation = Some(Deprecation {
            since: since.into(),
            message: message.into(),
            replacement: replacement.map(str::to_string),
        });
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    pub fn in_preset(&self, preset: Preset) -> bool {
        self.presets.contains(&preset)
    }

    /// Whether `name` is this linter's name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name() == name || self.alternative_names.iter().any(|n| n == name)
    }
}

impl fmt::Debug for LinterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinterConfig")
            .field("name", &self.name())
            .field("enabled_by_default", &self.enabled_by_default)
            .field("presets", &self.presets)
            .field("alternative_names", &self.alternative_names)
            .field("is_slow", &self.is_slow)
            .field("mutates_shared_state", &self.mutates_shared_state)
            .field("load_mode", &self.load_mode)
            .field("deprecation", &self.deprecation)
            .finish()
    }
}
