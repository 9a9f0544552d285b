use super::{prepare, EXIT_SUCCESS};
use crate::cli::SelectionArgs;
use crate::linter::LinterConfig;
use crate::registry::{EnabledSet, LinterRegistry, ProviderCatalog};
use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;

pub fn list_linters(explicit: Option<&Path>, selection: &SelectionArgs) -> Result<i32> {
    let prepared = prepare(explicit, |config| selection.apply(&mut config.linters))?;
    let providers = ProviderCatalog::with_builtin();
    let enabled = EnabledSet::new(&prepared.registry, &providers, &prepared.config).get_map()?;

    print!("{}", format_linters(&enabled, &prepared.registry));
    Ok(EXIT_SUCCESS)
}

/// Enabled linters (config-declared ones included), then the rest of the
/// registry.
pub fn format_linters(enabled: &BTreeMap<String, LinterConfig>, registry: &LinterRegistry) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Enabled by your configuration linters:".green().bold()));
    for lc in enabled.values() {
        out.push_str(&describe(lc));
    }

    let mut disabled: Vec<&LinterConfig> = registry
        .all()
        .iter()
        .filter(|lc| !enabled.contains_key(lc.name()))
        .collect();
    disabled.sort_by(|a, b| a.name().cmp(b.name()));

    out.push_str(&format!("\n{}\n", "Disabled by your configuration linters:".red().bold()));
    for lc in disabled {
        out.push_str(&describe(lc));
    }
    out
}

fn describe(lc: &LinterConfig) -> String {
    let mut name = lc.name().bold().to_string();
    if !lc.alternative_names.is_empty() {
        name.push_str(&format!(" ({})", lc.alternative_names.join(", ")));
    }
    let mut flags = format!("fast: {}", !lc.is_slow);
    if lc.is_deprecated() {
        flags.push_str(", deprecated");
    }
    format!("{}: {} [{}]\n", name, lc.linter.description(), flags)
}
