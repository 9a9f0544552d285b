//! Reports files that could not be loaded. These diagnostics are never hidden
//! as generated code: they explain why the rest of the analysis is incomplete.

use crate::core::{AnalysisContext, Diagnostic};
use crate::linter::Linter;

pub const NAME: &str = "typecheck";

pub struct Typecheck;

impl Linter for Typecheck {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Reports files that can't be loaded"
    }

    fn run(&self, ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
        Ok(ctx
            .load_errors()
            .iter()
            .map(|e| Diagnostic::new(&e.path, e.line, &e.message).with_linter(NAME))
            .collect())
    }
}
