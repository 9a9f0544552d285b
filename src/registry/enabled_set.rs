//! Resolution of the set of linters that run.

use super::composite::combine_incremental_linters;
use super::providers::{load_custom_linters, ProviderCatalog};
use super::{LinterRegistry, Preset};
use crate::config::validation::validate_linters_config;
use crate::config::Config;
use crate::errors::Result;
use crate::linter::LinterConfig;
use std::collections::BTreeMap;

/// Computes the enabled linters from the configuration and the registry.
pub struct EnabledSet<'a> {
    registry: &'a LinterRegistry,
    providers: &'a ProviderCatalog,
    config: &'a Config,
}

impl<'a> EnabledSet<'a> {
    pub fn new(
        registry: &'a LinterRegistry,
        providers: &'a ProviderCatalog,
        config: &'a Config,
    ) -> Self {
        Self {
            registry,
            providers,
            config,
        }
    }

    /// Selection steps, in order: seed, presets, fast, enable, disable,
    /// custom linters. Expects a validated selection.
    fn build(&self) -> BTreeMap<String, LinterConfig> {
        let lcfg = &self.config.linters;
        let mut result: BTreeMap<String, LinterConfig> = BTreeMap::new();
        let insert = |result: &mut BTreeMap<String, LinterConfig>, lc: &LinterConfig| {
            result.insert(lc.name().to_string(), lc.clone());
        };

        // Presets imply disable-all.
        if lcfg.presets.is_empty() {
            if lcfg.enable_all {
                for lc in self.registry.all() {
                    insert(&mut result, lc);
                }
            } else if !lcfg.disable_all {
                for lc in self.registry.enabled_by_default() {
                    insert(&mut result, lc);
                }
            }
        }

        for preset in lcfg.presets.iter().filter_map(|p| Preset::parse(p)) {
            for lc in self.registry.for_preset(preset) {
                insert(&mut result, lc);
            }
        }

        // After presets so that `fast` narrows a preset, before enable and
        // disable so that a slow linter can still be enabled by name.
        if lcfg.fast {
            result.retain(|_, lc| !lc.is_slow);
        }

        for name in &lcfg.enable {
            if let Some(lc) = self.registry.lookup(name) {
                insert(&mut result, lc);
            }
        }

        for name in &lcfg.disable {
            if let Some(lc) = self.registry.lookup(name) {
                result.remove(lc.name());
            }
        }

        for lc in load_custom_linters(self.providers, &lcfg.custom) {
            result.insert(lc.name().to_string(), lc);
        }

        result
    }

    /// Enabled linters by name, without the composite optimization.
    pub fn get_map(&self) -> Result<BTreeMap<String, LinterConfig>> {
        validate_linters_config(&self.config.linters, self.registry)?;
        Ok(self.build())
    }

    /// Enabled linters in name order, optionally merging incremental linters
    /// into one composite.
    pub fn get(&self, optimize: bool) -> Result<Vec<LinterConfig>> {
        let linters = self.get_map()?;
        Ok(self.run_list(linters, optimize))
    }

    /// [`get`](Self::get) over a map already returned by
    /// [`get_map`](Self::get_map), so custom linters are built only once.
    pub fn run_list(
        &self,
        mut linters: BTreeMap<String, LinterConfig>,
        optimize: bool,
    ) -> Vec<LinterConfig> {
        self.log_status(&linters);
        if optimize {
            combine_incremental_linters(&mut linters);
        }
        linters.into_values().collect()
    }

    fn log_status(&self, linters: &BTreeMap<String, LinterConfig>) {
        let names: Vec<&str> = linters.keys().map(String::as_str).collect();
        log::info!("Active {} linters: [{}]", names.len(), names.join(" "));

        if !self.config.linters.presets.is_empty() {
            let mut presets = self.config.linters.presets.clone();
            presets.sort();
            log::info!("Active presets: [{}]", presets.join(" "));
        }
    }
}
