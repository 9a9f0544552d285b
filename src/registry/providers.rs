//! External linters declared in configuration and built by providers.
//!
//! A `[linters.custom.NAME]` section names a provider id; the provider turns
//! the section into a [`LinterConfig`]. A declaration that fails to load is
//! logged and skipped, it never aborts the run.

use crate::config::CustomLinterSettings;
use crate::core::{Diagnostic, SourceFile};
use crate::linter::{FileCheck, FileCheckLinter, LinterConfig};
use crate::registry::Preset;
use anyhow::{anyhow, Context};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Builds linters from configuration declarations.
pub trait LinterProvider: Send + Sync {
    /// Id used in the `provider` key.
    fn id(&self) -> &str;

    fn load(&self, name: &str, settings: &CustomLinterSettings) -> anyhow::Result<LinterConfig>;
}

/// Providers available to configuration, by id.
#[derive(Default, Clone)]
pub struct ProviderCatalog {
    providers: HashMap<String, Arc<dyn LinterProvider>>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the providers shipped with lintmux.
    pub fn with_builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(Arc::new(RegexProvider));
        catalog
    }

    pub fn register(&mut self, provider: Arc<dyn LinterProvider>) {
        self.providers.insert(provider.id().to_string(), provider);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn LinterProvider>> {
        self.providers.get(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn load(&self, name: &str, settings: &CustomLinterSettings) -> anyhow::Result<LinterConfig> {
        let provider = self.get(&settings.provider).ok_or_else(|| {
            anyhow!(
                "unknown provider {:?}, known providers: {}",
                settings.provider,
                self.ids().join(", ")
            )
        })?;
        provider.load(name, settings)
    }
}

impl std::fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("providers", &self.ids())
            .finish()
    }
}

/// Load every declared custom linter, skipping (and logging) failures.
pub fn load_custom_linters(
    catalog: &ProviderCatalog,
    custom: &BTreeMap<String, CustomLinterSettings>,
) -> Vec<LinterConfig> {
    custom
        .iter()
        .filter_map(|(name, settings)| match catalog.load(name, settings) {
            Ok(config) => {
                log::info!("Loaded {}: {}", settings.provider, config.name());
                if config.name() != name {
                    log::warn!(
                        "Configuration linter name {} doesn't match provided linter name {}",
                        name,
                        config.name()
                    );
                }
                Some(config)
            }
            Err(e) => {
                log::error!(
                    "Unable to load custom linter {} (provider {}): {:#}",
                    name,
                    settings.provider,
                    e
                );
                None
            }
        })
        .collect()
}

/// Reports every match of a regular expression, one diagnostic per match.
pub struct RegexProvider;

impl LinterProvider for RegexProvider {
    fn id(&self) -> &str {
        "regex"
    }

    fn load(&self, name: &str, settings: &CustomLinterSettings) -> anyhow::Result<LinterConfig> {
        let pattern = settings
            .pattern
            .as_deref()
            .ok_or_else(|| anyhow!("the regex provider requires `pattern`"))?;
        let regex =
            Regex::new(pattern).with_context(|| format!("invalid pattern {:?}", pattern))?;
        let presets = settings
            .presets
            .iter()
            .map(|p| p.parse::<Preset>().map_err(|e| anyhow!(e)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let description = if settings.description.is_empty() {
            format!("Reports matches of {}", pattern)
        } else {
            settings.description.clone()
        };
        let check = RegexCheck {
            name: name.to_string(),
            description,
            regex,
            message: settings
                .message
                .clone()
                .unwrap_or_else(|| "found `$0`".to_string()),
        };

        let mut config = LinterConfig::new(Arc::new(FileCheckLinter::single(Arc::new(check))))
            .with_presets(&presets);
        config.is_slow = settings.slow;
        config.url = settings.url.clone();
        Ok(config)
    }
}

struct RegexCheck {
    name: String,
    description: String,
    regex: Regex,
    message: String,
}

impl FileCheck for RegexCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn check(&self, file: &SourceFile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (idx, line) in file.lines().enumerate() {
            for caps in self.regex.captures_iter(line) {
                let Some(whole) = caps.get(0) else { continue };
                let mut message = String::new();
                caps.expand(&self.message, &mut message);
                diagnostics.push(
                    Diagnostic::new(&file.path, idx + 1, message)
                        .with_column(line[..whole.start()].chars().count() + 1)
                        .with_linter(&self.name),
                );
            }
        }
        diagnostics
    }
}
