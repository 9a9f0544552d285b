//! Core data shared by every part of a run: the diagnostic model and the
//! analysis context linters read from.

pub mod context;
pub mod diagnostic;

pub use context::{AnalysisContext, AnalysisState, LineDirectives, LoadError, SourceFile};
pub use diagnostic::{Diagnostic, LineRange, Replacement};
