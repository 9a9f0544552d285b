use indoc::indoc;
use lintmux::config::{load_config, parse_config};
use lintmux::{builtin_registry, validate_config, Config, Error};
use std::fs;
use tempfile::TempDir;

fn validate(toml: &str) -> lintmux::Result<Config> {
    let config = parse_config(toml)?;
    let registry = builtin_registry(&config.linters_settings);
    validate_config(&config, &registry)?;
    Ok(config)
}

fn config_error(toml: &str) -> String {
    match validate(toml) {
        Err(e @ Error::Config { .. }) => e.to_string(),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn test_full_config_is_accepted() {
    let config = validate(indoc! {r#"
        [run]
        skip_dirs = ["^gen/"]
        skip_files = ["_test\\.go$"]

        [linters]
        enable = ["lll", "todo"]
        presets = ["format"]

        [linters_settings.lll]
        line_length = 100

        [issues]
        max_same_issues = 0

        [[issues.exclude_rules]]
        linters = ["lll"]
        path = "^docs/"

        [severity]
        default = "warning"

        [[severity.rules]]
        severity = "info"
        linters = ["godox"]
    "#})
    .unwrap();

    assert_eq!(config.linters_settings.lll.line_length, 100);
    assert_eq!(config.issues.exclude_rules.len(), 1);
    assert_eq!(config.issues.max_same_issues, 0);
    assert_eq!(config.severity.rules[0].severity, "info");
}

#[test]
fn test_exclude_rule_with_one_condition_is_rejected() {
    let message = config_error(indoc! {r#"
        [[issues.exclude_rules]]
        linters = ["lll"]
    "#});
    assert!(message.contains("error in exclude rule #0: at least 2 of"), "{message}");
}

#[test]
fn test_path_and_path_except_together_are_rejected() {
    let message = config_error(indoc! {r#"
        [[issues.exclude_rules]]
        path = "^a/"
        path_except = "^b/"
        text = "x"
    "#});
    assert!(message.contains("should not be set at the same time"), "{message}");
}

#[test]
fn test_severity_rule_without_severity_is_rejected() {
    let message = config_error(indoc! {r#"
        [[severity.rules]]
        linters = ["lll"]
    "#});
    assert!(message.contains("severity should be set"), "{message}");
}

#[test]
fn test_unknown_linter_in_rules_is_reported() {
    let result = validate(indoc! {r#"
        [[severity.rules]]
        severity = "info"
        linters = ["nosuch"]

        [issues.max_per_file_from_linter]
        nosuch = 2
    "#});
    match result {
        Err(Error::UnknownLinters { names }) => assert_eq!(names, vec!["nosuch"]),
        other => panic!("expected unknown linters, got {other:?}"),
    }
}

#[test]
fn test_custom_linter_names_are_known_to_rules() {
    validate(indoc! {r#"
        [linters.custom.no-println]
        provider = "regex"
        description = "no println"
        pattern = "println!"

        [[severity.rules]]
        severity = "warning"
        linters = ["no-println"]
    "#})
    .unwrap();
}

#[test]
fn test_bad_regex_is_rejected() {
    let result = validate(indoc! {r#"
        [issues]
        exclude = ["(unclosed"]
    "#});
    assert!(matches!(result, Err(Error::Regex { .. })), "{result:?}");
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let message = config_error("[linters\nenable = 1");
    assert!(message.starts_with("configuration error: failed to parse .lintmux.toml"));
}

#[test]
fn test_nearest_config_file_wins() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.path().join(".lintmux.toml"),
        "[linters]\nenable = [\"dupl\"]\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("a/.lintmux.toml"),
        "[linters]\nenable = [\"lll\"]\n",
    )
    .unwrap();

    let (config, path) = load_config(&nested, None).unwrap();
    assert_eq!(config.linters.enable, vec!["lll"]);
    assert_eq!(path, Some(dir.path().join("a/.lintmux.toml")));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("none.toml");
    assert!(load_config(dir.path(), Some(&missing)).is_err());
}
