//! Wall-clock accounting for linters and pipeline stages.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Timing information for one linter or stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub name: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.2}s", self.name, self.duration.as_secs_f64())
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Accumulates durations per named stage, in first-seen order.
#[derive(Debug)]
pub struct Stopwatch {
    name: String,
    started: Instant,
    stages: Vec<StageTiming>,
}

impl Stopwatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            stages: Vec::new(),
        }
    }

    /// Run `f`, adding its duration to `stage`.
    pub fn track_stage<T>(&mut self, stage: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.add(stage, start.elapsed());
        out
    }

    pub fn add(&mut self, stage: &str, elapsed: Duration) {
        match self.stages.iter_mut().find(|s| s.name == stage) {
            Some(timing) => timing.duration += elapsed,
            None => self.stages.push(StageTiming {
                name: stage.to_string(),
                duration: elapsed,
            }),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stage timings, slowest first.
    pub fn stages(&self) -> Vec<StageTiming> {
        let mut stages = self.stages.clone();
        stages.sort_by(|a, b| b.duration.cmp(&a.duration).then_with(|| a.name.cmp(&b.name)));
        stages
    }

    /// Log the slowest stages at debug level.
    pub fn log_stages(&self) {
        let parts: Vec<String> = self.stages().iter().map(StageTiming::format).collect();
        if !parts.is_empty() {
            log::debug!(
                "{} took {:.2}s with stages: {}",
                self.name,
                self.elapsed().as_secs_f64(),
                parts.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_stage_accumulates() {
        let mut sw = Stopwatch::new("test");
        sw.add("a", Duration::from_millis(5));
        sw.add("b", Duration::from_millis(20));
        sw.add("a", Duration::from_millis(30));

        let stages = sw.stages();
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].name, "a");
        assert_eq!(stages[0].duration, Duration::from_millis(35));
    }

    #[test]
    fn test_track_stage_returns_value() {
        let mut sw = Stopwatch::new("test");
        assert_eq!(sw.track_stage("calc", || 2 * 21), 42);
        assert_eq!(sw.stages()[0].name, "calc");
    }

    #[test]
    fn test_format() {
        let timing = StageTiming {
            name: "lll".into(),
            duration: Duration::from_millis(1500),
        };
        assert_eq!(timing.format(), "lll: 1.50s");
    }
}
