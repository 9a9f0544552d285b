//! Error types shared by the resolver, runner, pipeline and fixer.
//!
//! Only configuration errors (`ConfigConflict`, `UnknownLinters`, `Config`)
//! are fatal. Linter failures are collected into [`RunErrors`], stage and fix
//! failures are logged where they happen and never abort a run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lintmux operations
#[derive(Debug, Error)]
pub enum Error {
    /// Contradictory or invalid linter selection
    #[error("{0}")]
    ConfigConflict(String),

    /// Enable/disable (or rule) names that resolve to no known linter
    #[error(
        "unknown linters: '{}', run 'lintmux linters' to see the list of supported linters",
        .names.join(",")
    )]
    UnknownLinters { names: Vec<String> },

    /// Configuration file could not be read or parsed
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// A linter returned an error
    #[error("can't run linter {linter}: {message}")]
    LinterFailed { linter: String, message: String },

    /// A linter panicked while running
    #[error("{linter}: panic occurred: {message}")]
    LinterPanicked { linter: String, message: String },

    /// A pipeline stage failed; the stage is skipped
    #[error("can't process result by {stage} stage: {message}")]
    StageProcessing { stage: String, message: String },

    /// A fix could not be applied to a file
    #[error("failed to fix issues in file {}: {message}", .path.display())]
    FixApplication { path: PathBuf, message: String },

    /// Invalid regular expression in configuration
    #[error("can't compile regexp {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Git errors from diff mode
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a selection conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConfigConflict(message.into())
    }

    /// Create a configuration error without file context
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error for a specific file
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a stage processing error
    pub fn stage(stage: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::StageProcessing {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// Create a fix application error
    pub fn fix(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::FixApplication {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error must abort the run before any linter executes.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigConflict(_)
                | Self::UnknownLinters { .. }
                | Self::Config { .. }
                | Self::Regex { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Compile a user supplied regular expression, keeping the pattern for the message.
pub fn compile_regex(pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern).map_err(|source| Error::Regex {
        pattern: pattern.to_string(),
        source,
    })
}

/// Per-linter failures collected over one run.
///
/// Diagnostics of the linters that succeeded are still processed; this value
/// only reports which linters could not contribute.
#[derive(Debug, Default)]
pub struct RunErrors {
    errors: Vec<Error>,
}

impl RunErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Names of the linters that failed, in execution order.
    pub fn failed_linters(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter_map(|e| match e {
                Error::LinterFailed { linter, .. } | Error::LinterPanicked { linter, .. } => {
                    Some(linter.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// `None` when nothing failed.
    pub fn into_option(self) -> Option<Self> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for RunErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for RunErrors {}
