use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::Config;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".lintmux.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str::<Config>(contents)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e)))
}

/// Load the configuration at `path`. Unlike discovery, a missing file is an error.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents = read_config_file(path).map_err(|e| {
        Error::config_with_path(format!("can't read {}: {}", path.display(), e), path)
    })?;
    let config = toml::from_str::<Config>(&contents).map_err(|e| {
        Error::config_with_path(format!("can't parse {}: {}", path.display(), e), path)
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Directories from `start` upwards, at most `max_depth` of them.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.lintmux.toml` in `start` or one of its parents.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Load the configuration: `explicit` when given, otherwise the nearest file
/// found from `start`, otherwise the defaults. Returns the file actually used.
pub fn load_config(start: &Path, explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_config_from_path(path)?, Some(path.to_path_buf())));
    }

    match find_config_file(start) {
        Some(path) => Ok((load_config_from_path(&path)?, Some(path))),
        None => {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok((Config::default(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = parse_config(indoc! {r#"
            [linters]
            enable = ["lll"]
            presets = ["style"]

            [issues]
            max_same_issues = 0

            [[issues.exclude_rules]]
            linters = ["lll"]
            path = "_test\\.rs$"

            [[severity.rules]]
            severity = "warning"
            linters = ["godox"]
        "#})
        .unwrap();

        assert_eq!(config.linters.enable, vec!["lll"]);
        assert_eq!(config.issues.max_same_issues, 0);
        assert_eq!(config.issues.max_issues_per_linter, 50);
        assert_eq!(config.issues.exclude_rules[0].rule.condition_count(), 2);
        assert_eq!(config.severity.rules[0].severity, "warning");
        assert!(config.run.skip_dirs_use_default);
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = parse_config("[linters\nenable = 1").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_directory_ancestors_limit() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_load_config_searches_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("crates/core");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[linters]\nfast = true\n",
        )
        .unwrap();

        let (config, path) = load_config(&nested, None).unwrap();
        assert!(config.linters.fast);
        assert_eq!(path, Some(dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());
    }
}
