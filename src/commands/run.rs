use super::{prepare, EXIT_ISSUES_FOUND, EXIT_LINTER_FAILED, EXIT_SUCCESS};
use crate::cli::RunArgs;
use crate::config::OutputFormat;
use crate::core::AnalysisContext;
use crate::pipeline::standard_pipeline;
use crate::registry::{EnabledSet, ProviderCatalog};
use crate::render::{render_json, render_text};
use crate::runner::{RunOutcome, Runner};
use anyhow::Result;
use std::path::Path;

/// Resolve, run, render. Configuration problems are returned as errors
/// before any linter runs.
pub fn run_lint(explicit: Option<&Path>, args: &RunArgs) -> Result<i32> {
    let prepared = prepare(explicit, |config| args.apply(config))?;
    let config = &prepared.config;

    let providers = ProviderCatalog::with_builtin();
    let enabled_set = EnabledSet::new(&prepared.registry, &providers, config);
    let enabled = enabled_set.get_map()?;
    let linters = enabled_set.run_list(enabled.clone(), !args.no_optimize);

    let mut ctx = AnalysisContext::load(&prepared.root, &args.paths, &config.run.extensions)?;
    let pipeline = standard_pipeline(config, &ctx, &prepared.registry)?;

    let mut runner = Runner::new(pipeline, &enabled);
    let outcome = runner.run(&linters, &mut ctx);

    match config.output.format {
        OutputFormat::Text => print!("{}", render_text(&outcome.diagnostics)),
        OutputFormat::Json => println!("{}", render_json(&outcome)?),
    }

    Ok(exit_code(&outcome))
}

/// A failed linter outranks found issues: its missing diagnostics make the
/// result incomplete.
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    if let Some(errors) = &outcome.errors {
        log::error!("{} linters failed: {}", errors.len(), errors.failed_linters().join(", "));
        return EXIT_LINTER_FAILED;
    }
    if outcome.diagnostics.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_ISSUES_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Diagnostic;
    use crate::errors::{Error, RunErrors};

    #[test]
    fn test_exit_codes() {
        let mut outcome = RunOutcome::default();
        assert_eq!(exit_code(&outcome), EXIT_SUCCESS);

        outcome.diagnostics.push(Diagnostic::new("a.rs", 1, "x"));
        assert_eq!(exit_code(&outcome), EXIT_ISSUES_FOUND);

        let mut errors = RunErrors::new();
        errors.push(Error::LinterFailed {
            linter: "dupl".into(),
            message: "boom".into(),
        });
        outcome.errors = Some(errors);
        assert_eq!(exit_code(&outcome), EXIT_LINTER_FAILED);
    }
}
