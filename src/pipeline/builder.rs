//! Pipeline assembly and execution.

use super::stage::Stage;
use crate::core::Diagnostic;
use crate::observability::{set_current_stage, StageTiming, Stopwatch};
use serde::Serialize;

/// Builder for constructing pipelines.
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new()
///     .stage(PathPrettifier::new(root))
///     .when(config.issues.fix, |p| p.stage(Fixer::new(root)))
///     .stage(SortResults)
///     .build();
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Apply `f` only when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

/// Diagnostics in and out of one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageStat {
    pub name: String,
    pub in_count: usize,
    pub out_count: usize,
    /// The stage returned an error and was skipped
    pub failed: bool,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub diagnostics: Vec<Diagnostic>,
    /// One entry per stage, in pipeline order
    pub stats: Vec<StageStat>,
    /// Time spent per stage, processing and finishing included
    pub timings: Vec<StageTiming>,
}

impl PipelineReport {
    /// `name: out/in` for every stage that saw diagnostics.
    pub fn filtering_stat(&self) -> String {
        self.stats
            .iter()
            .filter(|s| s.in_count != 0)
            .map(|s| format!("{}: {}/{}", s.name, s.out_count, s.in_count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Ordered stages applied to the diagnostics of a run.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, then call every stage's `finish`.
    pub fn run(&mut self, diagnostics: Vec<Diagnostic>) -> PipelineReport {
        let mut sw = Stopwatch::new("processing");
        let mut stats: Vec<StageStat> = self
            .stages
            .iter()
            .map(|s| StageStat {
                name: s.name().to_string(),
                ..StageStat::default()
            })
            .collect();

        let diagnostics = if diagnostics.is_empty() {
            diagnostics
        } else {
            self.process(diagnostics, &mut sw, &mut stats)
        };

        for stage in &mut self.stages {
            let name = stage.name().to_string();
            let _stage = set_current_stage(name.as_str());
            sw.track_stage(&name, || stage.finish());
        }
        sw.log_stages();

        PipelineReport {
            diagnostics,
            stats,
            timings: sw.stages(),
        }
    }

    fn process(
        &mut self,
        mut diagnostics: Vec<Diagnostic>,
        sw: &mut Stopwatch,
        stats: &mut [StageStat],
    ) -> Vec<Diagnostic> {
        for (stage, stat) in self.stages.iter_mut().zip(stats.iter_mut()) {
            let name = stage.name().to_string();
            let _span = tracing::debug_span!("stage", name = %name).entered();
            let _stage = set_current_stage(name.as_str());

            match sw.track_stage(&name, || stage.process(&diagnostics)) {
                Ok(out) => {
                    stat.in_count = diagnostics.len();
                    stat.out_count = out.len();
                    diagnostics = out;
                }
                Err(e) => {
                    stat.failed = true;
                    log::warn!("Can't process result by {} stage: {}", name, e);
                }
            }
        }
        diagnostics
    }
}
