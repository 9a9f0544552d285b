//! CLI command implementations.
//!
//! Available commands:
//! - **run**: resolve the enabled linters, run them and print the diagnostics
//! - **linters**: list enabled and disabled linters for the current config
//! - **config path**: print the configuration file in use
//!
//! Commands return the process exit code; `main` maps errors to
//! [`EXIT_FAILURE`].

pub mod config;
pub mod linters;
pub mod run;

pub use config::print_config_path;
pub use linters::list_linters;
pub use run::run_lint;

use crate::config::{load_config, validate_config, Config};
use crate::linters::builtin_registry;
use crate::registry::LinterRegistry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// No issues.
pub const EXIT_SUCCESS: i32 = 0;
/// The run found issues.
pub const EXIT_ISSUES_FOUND: i32 = 1;
/// Invalid configuration or another failure before linters ran.
pub const EXIT_FAILURE: i32 = 3;
/// The run finished but at least one linter failed.
pub const EXIT_LINTER_FAILED: i32 = 4;

/// A loaded and validated configuration with the registry it was checked
/// against.
pub struct Prepared {
    pub root: PathBuf,
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub registry: LinterRegistry,
}

/// Load the configuration, let `overlay` apply CLI flags, then validate.
pub fn prepare(explicit: Option<&Path>, overlay: impl FnOnce(&mut Config)) -> Result<Prepared> {
    let root = std::env::current_dir().context("can't get working directory")?;
    let (mut config, config_path) = load_config(&root, explicit)?;
    match &config_path {
        Some(path) => log::info!("Config search paths: used {}", path.display()),
        None => log::info!("No config file found, using defaults"),
    }

    overlay(&mut config);
    let registry = builtin_registry(&config.linters_settings);
    validate_config(&config, &registry)?;

    Ok(Prepared {
        root,
        config,
        config_path,
        registry,
    })
}
