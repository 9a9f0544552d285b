//! lintmux runs a configurable set of linters over a source tree and passes
//! their diagnostics through an ordered post-processing pipeline.
//!
//! The pieces, in the order a run uses them:
//! - [`config`]: `.lintmux.toml` loading and validation
//! - [`registry`]: known linters, presets and the enabled-set resolver
//! - [`runner`]: executes linters with failure isolation
//! - [`pipeline`]: the stages filtering and enriching diagnostics
//! - [`render`]: text and JSON output

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod linter;
pub mod linters;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod runner;

pub use crate::config::{load_config, validate_config, Config};
pub use crate::core::{AnalysisContext, Diagnostic, LineRange, Replacement, SourceFile};
pub use crate::errors::{Error, Result, RunErrors};
pub use crate::linter::{FileCheck, Linter, LinterConfig};
pub use crate::linters::builtin_registry;
pub use crate::pipeline::{standard_pipeline, Pipeline, PipelineBuilder, Stage};
pub use crate::registry::{EnabledSet, LinterRegistry, Preset, ProviderCatalog};
pub use crate::runner::{RunOutcome, RunStats, Runner};
