use super::EXIT_SUCCESS;
use crate::config::load_config;
use anyhow::{Context, Result};
use std::path::Path;

/// Print the configuration file that would be used, or a note when none is.
pub fn print_config_path(explicit: Option<&Path>) -> Result<i32> {
    let root = std::env::current_dir().context("can't get working directory")?;
    let (_, path) = load_config(&root, explicit)?;
    match path {
        Some(path) => println!("{}", path.display()),
        None => eprintln!("No config file detected"),
    }
    Ok(EXIT_SUCCESS)
}
