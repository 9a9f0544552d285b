//! Catalog of known linters and the selection logic built on it.

pub mod composite;
pub mod enabled_set;
pub mod presets;
pub mod providers;

pub use composite::{combine_incremental_linters, COMPOSITE_LINTER_NAME};
pub use enabled_set::EnabledSet;
pub use presets::Preset;
pub use providers::{load_custom_linters, LinterProvider, ProviderCatalog, RegexProvider};

use crate::linter::LinterConfig;

/// All linters lintmux knows about, in registration order.
#[derive(Debug, Default, Clone)]
pub struct LinterRegistry {
    linters: Vec<LinterConfig>,
}

impl LinterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a linter, replacing a registered one with the same name.
    pub fn register(&mut self, config: LinterConfig) {
        match self.linters.iter_mut().find(|lc| lc.name() == config.name()) {
            Some(existing) => *existing = config,
            None => self.linters.push(config),
        }
    }

    pub fn with(mut self, config: LinterConfig) -> Self {
        self.register(config);
        self
    }

    pub fn all(&self) -> &[LinterConfig] {
        &self.linters
    }

    /// Find a linter by name or alias.
    pub fn lookup(&self, name: &str) -> Option<&LinterConfig> {
        self.linters
            .iter()
            .find(|lc| lc.name() == name)
            .or_else(|| self.linters.iter().find(|lc| lc.answers_to(name)))
    }

    /// Canonical name for a name or alias.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(LinterConfig::name)
    }

    pub fn enabled_by_default(&self) -> Vec<&LinterConfig> {
        self.linters.iter().filter(|lc| lc.enabled_by_default).collect()
    }

    pub fn for_preset(&self, preset: Preset) -> Vec<&LinterConfig> {
        self.linters.iter().filter(|lc| lc.in_preset(preset)).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.linters.iter().map(LinterConfig::name).collect()
    }

    pub fn len(&self) -> usize {
        self.linters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linters.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::{AnalysisContext, Diagnostic, SourceFile};
    use crate::linter::{FileCheck, FileCheckLinter, Linter, LinterConfig, LoadMode};
    use crate::registry::{LinterRegistry, Preset};
    use std::sync::Arc;

    /// A check reporting nothing, to build registries in tests.
    pub struct NoopCheck(pub &'static str);

    impl FileCheck for NoopCheck {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "does nothing"
        }

        fn check(&self, _file: &SourceFile) -> Vec<Diagnostic> {
            Vec::new()
        }
    }

    /// A whole-program linter reporting nothing.
    pub struct NoopLinter(pub &'static str);

    impl Linter for NoopLinter {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "does nothing"
        }

        fn run(&self, _ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
            Ok(Vec::new())
        }
    }

    pub fn incremental(name: &'static str) -> LinterConfig {
        LinterConfig::new(Arc::new(FileCheckLinter::single(Arc::new(NoopCheck(name)))))
    }

    pub fn whole_program(name: &'static str) -> LinterConfig {
        LinterConfig::new(Arc::new(NoopLinter(name))).with_load_mode(LoadMode::WholeProgram)
    }

    /// alpha (default, style), beta (default, slow, bugs), gamma (style,
    /// alias "g"), delta (whole program, bugs).
    pub fn sample_registry() -> LinterRegistry {
        LinterRegistry::new()
            .with(
                incremental("alpha")
                    .with_enabled_by_default()
                    .with_presets(&[Preset::Style]),
            )
            .with(
                incremental("beta")
                    .with_enabled_by_default()
                    .with_slow()
                    .with_presets(&[Preset::Bugs]),
            )
            .with(
                incremental("gamma")
                    .with_presets(&[Preset::Style])
                    .with_alternative_names(&["g"]),
            )
            .with(whole_program("delta").with_presets(&[Preset::Bugs]))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_lookup_by_alias() {
        let registry = sample_registry();
        assert_eq!(registry.lookup("g").map(LinterConfig::name), Some("gamma"));
        assert_eq!(registry.canonical_name("gamma"), Some("gamma"));
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_enabled_by_default_and_presets() {
        let registry = sample_registry();
        let defaults: Vec<_> = registry.enabled_by_default().iter().map(|l| l.name()).collect();
        assert_eq!(defaults, vec!["alpha", "beta"]);

        let bugs: Vec<_> = registry.for_preset(Preset::Bugs).iter().map(|l| l.name()).collect();
        assert_eq!(bugs, vec!["beta", "delta"]);
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut registry = sample_registry();
        registry.register(incremental("alpha"));
        assert_eq!(registry.len(), 4);
        assert!(!registry.lookup("alpha").unwrap().enabled_by_default);
    }
}
