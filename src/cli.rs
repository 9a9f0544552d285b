use crate::config::{Config, LintersConfig, OutputFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lintmux")]
#[command(about = "Runs many linters and post-processes their diagnostics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: nearest .lintmux.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v: info, -vv: debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the enabled linters
    Run(RunArgs),

    /// List enabled and disabled linters
    Linters(SelectionArgs),

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the path of the configuration file in use
    Path,
}

/// Linter selection flags, added to the configuration file's selection.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Enable specific linters
    #[arg(short = 'E', long, value_delimiter = ',')]
    pub enable: Vec<String>,

    /// Disable specific linters
    #[arg(short = 'D', long, value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Enable presets of linters
    #[arg(short = 'p', long, value_delimiter = ',')]
    pub presets: Vec<String>,

    /// Enable all linters
    #[arg(long)]
    pub enable_all: bool,

    /// Disable all linters
    #[arg(long)]
    pub disable_all: bool,

    /// Run only fast linters from the enabled set
    #[arg(long)]
    pub fast: bool,
}

impl SelectionArgs {
    pub fn apply(&self, linters: &mut LintersConfig) {
        linters.enable.extend(self.enable.iter().cloned());
        linters.disable.extend(self.disable.iter().cloned());
        linters.presets.extend(self.presets.iter().cloned());
        linters.enable_all |= self.enable_all;
        linters.disable_all |= self.disable_all;
        linters.fast |= self.fast;
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Files or directories to analyze (default: the current directory)
    pub paths: Vec<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Apply suggested fixes to the source files
    #[arg(long)]
    pub fix: bool,

    /// Show only issues on lines changed against HEAD
    #[arg(long)]
    pub new: bool,

    /// Show only issues on lines changed since this revision
    #[arg(long, value_name = "REV")]
    pub new_from_rev: Option<String>,

    /// Show only issues on lines added by this unified diff
    #[arg(long, value_name = "PATH")]
    pub new_from_patch: Option<PathBuf>,

    /// In diff mode, show every issue of a changed file
    #[arg(long)]
    pub whole_files: bool,

    /// Maximum issues per linter, 0 for unlimited
    #[arg(long)]
    pub max_issues_per_linter: Option<usize>,

    /// Maximum issues with the same text, 0 for unlimited
    #[arg(long)]
    pub max_same_issues: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    pub out_format: Option<OutputFormat>,

    /// Prefix added to every reported path
    #[arg(long)]
    pub path_prefix: Option<String>,

    /// Run each incremental linter on its own instead of in one combined pass
    #[arg(long)]
    pub no_optimize: bool,
}

impl RunArgs {
    /// Overlay the flags on a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        self.selection.apply(&mut config.linters);

        let issues = &mut config.issues;
        issues.fix |= self.fix;
        issues.new |= self.new;
        issues.whole_files |= self.whole_files;
        if let Some(rev) = &self.new_from_rev {
            issues.new_from_rev = Some(rev.clone());
        }
        if let Some(patch) = &self.new_from_patch {
            issues.new_from_patch = Some(patch.clone());
        }
        if let Some(max) = self.max_issues_per_linter {
            issues.max_issues_per_linter = max;
        }
        if let Some(max) = self.max_same_issues {
            issues.max_same_issues = max;
        }

        if let Some(format) = self.out_format {
            config.output.format = format;
        }
        if let Some(prefix) = &self.path_prefix {
            config.output.path_prefix = prefix.clone();
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
