//! Properties of linter selection over arbitrary selections:
//! - every selection either resolves or fails with a configuration error
//! - resolving is idempotent
//! - no linter is selected twice, the composite included

use lintmux::config::{Config, LintersConfig};
use lintmux::registry::{EnabledSet, ProviderCatalog, COMPOSITE_LINTER_NAME};
use lintmux::{builtin_registry, Error};
use proptest::prelude::*;
use std::collections::HashSet;

const NAMES: &[&str] = &[
    "typecheck",
    "blanklines",
    "whitespace",
    "lll",
    "line-length",
    "godox",
    "todo",
    "dupl",
];

const PRESETS: &[&str] = &["bugs", "comment", "format", "style"];

fn subset(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(pool, 0..=3)
        .prop_map(|names| names.into_iter().map(String::from).collect())
}

fn selection() -> impl Strategy<Value = LintersConfig> {
    (
        subset(NAMES),
        subset(NAMES),
        subset(PRESETS),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(enable, disable, presets, enable_all, disable_all, fast)| LintersConfig {
                enable,
                disable,
                presets,
                enable_all,
                disable_all,
                fast,
                ..Default::default()
            },
        )
}

fn config_with(linters: LintersConfig) -> Config {
    Config {
        linters,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn prop_selection_resolves_or_is_rejected(linters in selection()) {
        let config = config_with(linters);
        let registry = builtin_registry(&config.linters_settings);
        let providers = ProviderCatalog::with_builtin();

        match EnabledSet::new(&registry, &providers, &config).get_map() {
            Ok(map) => {
                for name in map.keys() {
                    prop_assert!(registry.lookup(name).is_some());
                }
            }
            Err(e) => prop_assert!(
                matches!(e, Error::ConfigConflict(_) | Error::UnknownLinters { .. }),
                "unexpected error kind: {e}"
            ),
        }
    }

    #[test]
    fn prop_resolution_is_idempotent(linters in selection()) {
        let config = config_with(linters);
        let registry = builtin_registry(&config.linters_settings);
        let providers = ProviderCatalog::with_builtin();
        let set = EnabledSet::new(&registry, &providers, &config);

        let first = set.get_map().map(|m| m.into_keys().collect::<Vec<_>>());
        let second = set.get_map().map(|m| m.into_keys().collect::<Vec<_>>());
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "resolution changed between calls"),
        }
    }

    #[test]
    fn prop_no_linter_runs_twice(linters in selection(), optimize in any::<bool>()) {
        let config = config_with(linters);
        let registry = builtin_registry(&config.linters_settings);
        let providers = ProviderCatalog::with_builtin();

        let Ok(resolved) = EnabledSet::new(&registry, &providers, &config).get(optimize) else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        for lc in &resolved {
            let names: Vec<String> = match lc.linter.file_checks() {
                Some(checks) if lc.name() == COMPOSITE_LINTER_NAME => {
                    checks.iter().map(|c| c.name().to_string()).collect()
                }
                _ => vec![lc.name().to_string()],
            };
            for name in names {
                prop_assert!(seen.insert(name.clone()), "{} selected twice", name);
            }
        }
    }
}

#[test]
fn test_conflict_kinds() {
    let registry = builtin_registry(&Default::default());
    let providers = ProviderCatalog::with_builtin();
    let resolve = |linters: LintersConfig| {
        let config = config_with(linters);
        EnabledSet::new(&registry, &providers, &config)
            .get_map()
            .map(|_| ())
            .map_err(|e| e.to_string())
    };

    let cases = [
        (
            LintersConfig {
                enable_all: true,
                disable_all: true,
                ..Default::default()
            },
            "--enable-all and --disable-all options must not be combined",
        ),
        (
            LintersConfig {
                disable_all: true,
                ..Default::default()
            },
            "all linters were disabled, but no one linter was enabled: must enable at least one",
        ),
        (
            LintersConfig {
                presets: vec!["style".into()],
                enable_all: true,
                ..Default::default()
            },
            "--presets is incompatible with --enable-all",
        ),
        (
            LintersConfig {
                enable: vec!["lll".into()],
                disable: vec!["lll".into()],
                ..Default::default()
            },
            "linter \"lll\" can't be disabled and enabled at one moment",
        ),
        (
            LintersConfig {
                enable: vec!["nosuch".into(), "lll".into(), "other".into()],
                ..Default::default()
            },
            "unknown linters: 'nosuch,other', run 'lintmux linters' to see the list of supported linters",
        ),
    ];

    for (linters, expected) in cases {
        assert_eq!(resolve(linters), Err(expected.to_string()));
    }
}

#[test]
fn test_enable_all_with_fast_keeps_enable_list() {
    let registry = builtin_registry(&Default::default());
    let providers = ProviderCatalog::with_builtin();
    let config = config_with(LintersConfig {
        enable_all: true,
        fast: true,
        enable: vec!["dupl".into()],
        ..Default::default()
    });

    let map = EnabledSet::new(&registry, &providers, &config).get_map().unwrap();
    assert!(map.contains_key("dupl"));
    assert!(map.contains_key("lll"));
}
