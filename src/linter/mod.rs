//! The contract every analysis linter satisfies to take part in a run.
//!
//! A [`Linter`] is an opaque capability: given the shared
//! [`AnalysisContext`] it returns diagnostics or an error. Linters built from
//! per-file [`FileCheck`]s additionally expose those checks, which lets the
//! resolver merge several of them into one composite pass.

pub mod descriptor;
pub mod file_check;

pub use descriptor::{Deprecation, LinterConfig, LoadMode};
pub use file_check::{FileCheck, FileCheckLinter};

use crate::core::{AnalysisContext, Diagnostic};
use std::sync::Arc;

pub trait Linter: Send + Sync {
    /// Unique name, also the id used in configuration.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Analyze the context. Must not assume exclusive ownership of the
    /// context's shared state unless the descriptor says it mutates it.
    fn run(&self, ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>>;

    /// The per-file checks this linter consists of, when it runs incrementally.
    fn file_checks(&self) -> Option<Vec<Arc<dyn FileCheck>>> {
        None
    }
}
