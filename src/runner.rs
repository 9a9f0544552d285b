//! Runs the enabled linters and hands their diagnostics to the pipeline.
//!
//! Linters run one after another against the shared [`AnalysisContext`]. A
//! failing or panicking linter is recorded in [`RunErrors`] and the run goes
//! on; whatever the other linters reported still goes through the pipeline.

use crate::core::{AnalysisContext, Diagnostic};
use crate::errors::{Error, RunErrors};
use crate::linter::LinterConfig;
use crate::observability::{
    catch_panic, set_current_linter, set_phase, RunPhase, StageTiming, Stopwatch,
};
use crate::pipeline::{Pipeline, StageStat};
use serde::Serialize;
use std::collections::BTreeMap;

/// Observability data of one run, for the renderer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Wall-clock time per linter, slowest first
    pub linters: Vec<StageTiming>,
    /// In/out counts per pipeline stage, in pipeline order
    pub stages: Vec<StageStat>,
    pub stage_timings: Vec<StageTiming>,
    pub issues_before: usize,
    pub issues_after: usize,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub diagnostics: Vec<Diagnostic>,
    /// `None` when every linter succeeded
    pub errors: Option<RunErrors>,
    pub stats: RunStats,
}

pub struct Runner {
    pipeline: Pipeline,
}

impl Runner {
    /// Warns about every deprecated linter of `enabled`.
    pub fn new(pipeline: Pipeline, enabled: &BTreeMap<String, LinterConfig>) -> Self {
        for (name, lc) in enabled {
            let Some(deprecation) = &lc.deprecation else {
                continue;
            };
            let extra = deprecation
                .replacement
                .as_ref()
                .map(|r| format!("Replaced by {r}."))
                .unwrap_or_default();
            log::warn!(
                "The linter '{}' is deprecated (since {}) due to: {} {}",
                name,
                deprecation.since,
                deprecation.message,
                extra
            );
        }
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn run(&mut self, linters: &[LinterConfig], ctx: &mut AnalysisContext) -> RunOutcome {
        let mut sw = Stopwatch::new("linters");
        let mut errors = RunErrors::new();
        let mut diagnostics = Vec::new();

        {
            let _phase = set_phase(RunPhase::Linting);
            for lc in linters {
                match sw.track_stage(lc.name(), || run_linter_safe(lc, ctx)) {
                    Ok(found) => diagnostics.extend(found),
                    Err(e) => {
                        log::warn!("{}", e);
                        errors.push(e);
                    }
                }
            }
        }
        sw.log_stages();

        let issues_before = diagnostics.len();
        let report = {
            let _phase = set_phase(RunPhase::Processing);
            self.pipeline.run(diagnostics)
        };
        let issues_after = report.diagnostics.len();

        if issues_before != issues_after {
            log::info!(
                "Issues before processing: {}, after processing: {}",
                issues_before,
                issues_after
            );
        }
        let filtering = report.filtering_stat();
        if !filtering.is_empty() {
            log::info!("Processors filtering stat (out/in): {}", filtering);
        }

        RunOutcome {
            diagnostics: report.diagnostics,
            errors: errors.into_option(),
            stats: RunStats {
                linters: sw.stages(),
                stages: report.stats,
                stage_timings: report.timings,
                issues_before,
                issues_after,
            },
        }
    }
}

/// Run one linter, isolating its failures.
///
/// The shared state is reset after linters that mutate it and after any
/// panic, which may have left it half-written.
fn run_linter_safe(lc: &LinterConfig, ctx: &mut AnalysisContext) -> Result<Vec<Diagnostic>, Error> {
    let name = lc.name().to_string();
    let _linter = set_current_linter(name.as_str());
    let _span = tracing::debug_span!("linter", name = %name).entered();

    let result = catch_panic(|| lc.linter.run(ctx));
    if lc.mutates_shared_state || result.is_err() {
        ctx.reset_state();
    }

    match result {
        Ok(Ok(mut found)) => {
            for d in &mut found {
                if d.from_linter.is_empty() {
                    d.from_linter = name.clone();
                }
            }
            log::debug!("Linter {} reported {} issues", name, found.len());
            Ok(found)
        }
        Ok(Err(e)) => Err(Error::LinterFailed {
            linter: name,
            message: format!("{e:#}"),
        }),
        Err(panic) => {
            log::error!(
                "Panic: {}: {} at {}\n{}",
                name,
                panic.message,
                panic.location.as_deref().unwrap_or("unknown location"),
                panic.backtrace
            );
            Err(Error::LinterPanicked {
                linter: name,
                message: panic.message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Linter;
    use crate::pipeline::stages::SortResults;
    use crate::pipeline::PipelineBuilder;
    use std::sync::Arc;

    struct Reporting(&'static str, usize);

    impl Linter for Reporting {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "reports one issue per line"
        }

        fn run(&self, _ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
            Ok((1..=self.1)
                .map(|line| Diagnostic::new("a.rs", line, "found"))
                .collect())
        }
    }

    struct Exploding;

    impl Linter for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn description(&self) -> &str {
            "panics"
        }

        fn run(&self, ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
            *ctx.state_mut().entry::<usize>() += 1;
            panic!("index out of bounds");
        }
    }

    struct Failing;

    impl Linter for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "errors"
        }

        fn run(&self, _ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
            anyhow::bail!("no input")
        }
    }

    fn runner() -> Runner {
        Runner::new(PipelineBuilder::new().stage(SortResults).build(), &BTreeMap::new())
    }

    #[test]
    fn test_failures_are_isolated() {
        let linters = vec![
            LinterConfig::new(Arc::new(Reporting("first", 2))),
            LinterConfig::new(Arc::new(Exploding)),
            LinterConfig::new(Arc::new(Failing)),
            LinterConfig::new(Arc::new(Reporting("last", 1))),
        ];
        let mut ctx = AnalysisContext::new("/work");

        let outcome = runner().run(&linters, &mut ctx);

        assert_eq!(outcome.diagnostics.len(), 3);
        assert!(outcome.diagnostics.iter().all(|d| !d.from_linter.is_empty()));
        let errors = outcome.errors.unwrap();
        assert_eq!(errors.failed_linters(), vec!["exploding", "failing"]);
        assert!(errors.to_string().contains("index out of bounds"));
        assert_eq!(ctx.reset_count(), 1);
        assert!(ctx.state().is_empty());
    }

    #[test]
    fn test_mutating_linter_resets_state() {
        let linters = vec![
            LinterConfig::new(Arc::new(Reporting("plain", 1))),
            LinterConfig::new(Arc::new(Reporting("mutating", 1))).with_mutates_shared_state(),
        ];
        let mut ctx = AnalysisContext::new("/work");

        let outcome = runner().run(&linters, &mut ctx);

        assert!(outcome.errors.is_none());
        assert_eq!(ctx.reset_count(), 1);
        assert_eq!(outcome.stats.issues_before, 2);
        assert_eq!(outcome.stats.linters.len(), 2);
        assert_eq!(outcome.stats.stages[0].name, "sort_results");
    }

    #[test]
    fn test_stamps_linter_name_only_when_empty() {
        struct Attributed;
        impl Linter for Attributed {
            fn name(&self) -> &str {
                "composite"
            }
            fn description(&self) -> &str {
                "reports for a constituent"
            }
            fn run(&self, _ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
                Ok(vec![
                    Diagnostic::new("a.rs", 1, "x").with_linter("lll"),
                    Diagnostic::new("a.rs", 2, "y"),
                ])
            }
        }

        let mut ctx = AnalysisContext::new("/work");
        let outcome = runner().run(&[LinterConfig::new(Arc::new(Attributed))], &mut ctx);
        let linters: Vec<&str> = outcome
            .diagnostics
            .iter()
            .map(|d| d.from_linter.as_str())
            .collect();
        assert_eq!(linters, vec!["lll", "composite"]);
    }
}
