//! Configuration validation, run once before linter selection.
//!
//! Shape checks (rules, regexes, custom linter declarations) come first, then
//! the linter selection checks the resolver relies on. The first failing check
//! aborts the run; unknown linter names are reported together.

use super::{BaseRule, Config, LintersConfig};
use crate::errors::{compile_regex, Error, Result};
use crate::registry::presets::Preset;
use crate::registry::LinterRegistry;

/// Validate the whole configuration against the known linters.
pub fn validate_config(config: &Config, registry: &LinterRegistry) -> Result<()> {
    validate_patterns(config)?;
    validate_exclude_rules(config)?;
    validate_severity_rules(config)?;
    validate_custom_linters(config)?;
    validate_rule_linter_names(config, registry)?;
    validate_linters_config(&config.linters, registry)
}

/// Linter selection checks, also run by the resolver itself.
pub fn validate_linters_config(cfg: &LintersConfig, registry: &LinterRegistry) -> Result<()> {
    validate_linters_names(cfg, registry)?;
    validate_presets(cfg)?;
    validate_all_disable_enable_options(cfg)?;
    validate_disabled_and_enabled_at_one_moment(cfg)
}

fn validate_linters_names(cfg: &LintersConfig, registry: &LinterRegistry) -> Result<()> {
    let unknown: Vec<String> = cfg
        .enable
        .iter()
        .chain(&cfg.disable)
        .filter(|name| registry.lookup(name).is_none())
        .cloned()
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::UnknownLinters { names: unknown })
    }
}

fn validate_presets(cfg: &LintersConfig) -> Result<()> {
    for preset in &cfg.presets {
        preset.parse::<Preset>().map_err(Error::conflict)?;
    }

    if !cfg.presets.is_empty() && cfg.enable_all {
        return Err(Error::conflict("--presets is incompatible with --enable-all"));
    }

    Ok(())
}

fn validate_all_disable_enable_options(cfg: &LintersConfig) -> Result<()> {
    if cfg.enable_all && cfg.disable_all {
        return Err(Error::conflict(
            "--enable-all and --disable-all options must not be combined",
        ));
    }

    if cfg.disable_all {
        if cfg.enable.is_empty() && cfg.presets.is_empty() {
            return Err(Error::conflict(
                "all linters were disabled, but no one linter was enabled: must enable at least one",
            ));
        }

        if let Some(first) = cfg.disable.first() {
            return Err(Error::conflict(format!(
                "can't combine options --disable-all and --disable {}",
                first
            )));
        }
    }

    if cfg.enable_all && !cfg.fast {
        if let Some(first) = cfg.enable.first() {
            return Err(Error::conflict(format!(
                "can't combine options --enable-all and --enable {}",
                first
            )));
        }
    }

    Ok(())
}

fn validate_disabled_and_enabled_at_one_moment(cfg: &LintersConfig) -> Result<()> {
    match cfg.disable.iter().find(|name| cfg.enable.contains(name)) {
        Some(name) => Err(Error::conflict(format!(
            "linter {:?} can't be disabled and enabled at one moment",
            name
        ))),
        None => Ok(()),
    }
}

/// Every user regex must compile.
fn validate_patterns(config: &Config) -> Result<()> {
    let rules = config
        .issues
        .exclude_rules
        .iter()
        .map(|r| &r.rule)
        .chain(config.severity.rules.iter().map(|r| &r.rule));

    let patterns = config
        .run
        .skip_dirs
        .iter()
        .chain(&config.run.skip_files)
        .chain(&config.issues.exclude)
        .chain(&config.issues.include_paths)
        .map(String::as_str)
        .chain(rules.flat_map(BaseRule::patterns));

    for pattern in patterns {
        compile_regex(pattern)?;
    }
    Ok(())
}

fn validate_base_rule(rule: &BaseRule, min_conditions: usize, kind: &str, idx: usize) -> Result<()> {
    if rule.path.is_some() && rule.path_except.is_some() {
        return Err(Error::config(format!(
            "error in {} rule #{}: path and path_except should not be set at the same time",
            kind, idx
        )));
    }

    if rule.condition_count() < min_conditions {
        return Err(Error::config(format!(
            "error in {} rule #{}: at least {} of (text, source, path, path_except, linters) should be set",
            kind, idx, min_conditions
        )));
    }

    Ok(())
}

fn validate_exclude_rules(config: &Config) -> Result<()> {
    for (idx, rule) in config.issues.exclude_rules.iter().enumerate() {
        validate_base_rule(&rule.rule, 2, "exclude", idx)?;
    }
    Ok(())
}

fn validate_severity_rules(config: &Config) -> Result<()> {
    for (idx, rule) in config.severity.rules.iter().enumerate() {
        if rule.severity.is_empty() {
            return Err(Error::config(format!(
                "error in severity rule #{}: severity should be set",
                idx
            )));
        }
        validate_base_rule(&rule.rule, 1, "severity", idx)?;
    }
    Ok(())
}

fn validate_custom_linters(config: &Config) -> Result<()> {
    for (name, settings) in &config.linters.custom {
        if settings.provider.is_empty() {
            return Err(Error::config(format!(
                "custom linter {:?} must name a provider",
                name
            )));
        }
    }
    Ok(())
}

/// Linter names used by rules and caps must be known (built-in or custom).
fn validate_rule_linter_names(config: &Config, registry: &LinterRegistry) -> Result<()> {
    let is_known =
        |name: &str| registry.lookup(name).is_some() || config.linters.custom.contains_key(name);

    let mut unknown: Vec<String> = config
        .issues
        .exclude_rules
        .iter()
        .map(|r| &r.rule)
        .chain(config.severity.rules.iter().map(|r| &r.rule))
        .flat_map(|rule| rule.linters.iter())
        .chain(config.issues.max_per_file_from_linter.keys())
        .filter(|name| !is_known(name.as_str()))
        .cloned()
        .collect();
    unknown.sort();
    unknown.dedup();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::UnknownLinters { names: unknown })
    }
}
