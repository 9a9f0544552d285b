//! Linters shipped with lintmux.

pub mod blanklines;
pub mod dupl;
pub mod godox;
pub mod lll;
pub mod typecheck;

use crate::config::LintersSettings;
use crate::linter::{FileCheckLinter, LinterConfig, LoadMode};
use crate::registry::{LinterRegistry, Preset};
use std::sync::Arc;

/// Registry of the built-in linters configured with `settings`.
pub fn builtin_registry(settings: &LintersSettings) -> LinterRegistry {
    LinterRegistry::new()
        .with(
            LinterConfig::new(Arc::new(typecheck::Typecheck))
                .with_enabled_by_default()
                .with_presets(&[Preset::Bugs])
                .with_load_mode(LoadMode::TypesInfo),
        )
        .with(
            LinterConfig::new(Arc::new(FileCheckLinter::single(Arc::new(
                blanklines::BlankLines,
            ))))
            .with_enabled_by_default()
            .with_presets(&[Preset::Format, Preset::Style])
            .with_alternative_names(&["whitespace"]),
        )
        .with(
            LinterConfig::new(Arc::new(FileCheckLinter::single(Arc::new(
                lll::LineLength::new(&settings.lll),
            ))))
            .with_presets(&[Preset::Style])
            .with_alternative_names(&["line-length"]),
        )
        .with(
            LinterConfig::new(Arc::new(FileCheckLinter::single(Arc::new(
                godox::Godox::new(&settings.godox),
            ))))
            .with_presets(&[Preset::Comment, Preset::Style])
            .with_alternative_names(&["todo"]),
        )
        .with(
            LinterConfig::new(Arc::new(dupl::Dupl::new(&settings.dupl)))
                .with_presets(&[Preset::Style])
                .with_slow()
                .with_mutates_shared_state()
                .with_load_mode(LoadMode::WholeProgram),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry(&LintersSettings::default());
        assert_eq!(
            registry.names(),
            vec!["typecheck", "blanklines", "lll", "godox", "dupl"]
        );
        let defaults: Vec<_> = registry
            .enabled_by_default()
            .iter()
            .map(|lc| lc.name())
            .collect();
        assert_eq!(defaults, vec!["typecheck", "blanklines"]);
        assert_eq!(registry.canonical_name("todo"), Some("godox"));
        assert!(registry.lookup("dupl").is_some_and(|lc| lc.mutates_shared_state));
    }
}
