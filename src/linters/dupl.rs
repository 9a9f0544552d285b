//! Duplicate blocks of lines across the whole program.
//!
//! Builds an index of every window of `threshold` significant lines in the
//! shared analysis state, then reports each merged block that also appears
//! elsewhere. The index is left in the state, so the linter is registered as
//! mutating it.

use crate::config::DuplSettings;
use crate::core::{AnalysisContext, Diagnostic, LineRange, SourceFile};
use crate::linter::Linter;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

pub const NAME: &str = "dupl";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    path: PathBuf,
    lines: LineRange,
}

/// Window text to the places it occurs.
#[derive(Debug, Default)]
pub struct DuplIndex {
    windows: HashMap<String, Vec<Location>>,
}

impl DuplIndex {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

pub struct Dupl {
    threshold: usize,
}

impl Dupl {
    pub fn new(settings: &DuplSettings) -> Self {
        Self {
            threshold: settings.threshold.max(1),
        }
    }

    fn index_file(&self, index: &mut DuplIndex, file: &SourceFile) {
        let significant: Vec<(usize, &str)> = file
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
            .collect();

        for window in significant.windows(self.threshold) {
            let key = window
                .iter()
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n");
            let (first, _) = window[0];
            let (last, _) = window[window.len() - 1];
            index.windows.entry(key).or_default().push(Location {
                path: file.path.clone(),
                lines: LineRange::new(first, last),
            });
        }
    }
}

/// Windows of one file that occur elsewhere, with the first other place.
fn duplicated_windows(index: &DuplIndex) -> BTreeMap<PathBuf, Vec<(LineRange, Location)>> {
    let mut by_file: BTreeMap<PathBuf, Vec<(LineRange, Location)>> = BTreeMap::new();
    for locations in index.windows.values().filter(|l| l.len() > 1) {
        for here in locations {
            let other = locations
                .iter()
                .find(|o| o.path != here.path || !o.lines.overlaps(&here.lines));
            if let Some(other) = other {
                by_file
                    .entry(here.path.clone())
                    .or_default()
                    .push((here.lines, other.clone()));
            }
        }
    }
    by_file
}

impl Linter for Dupl {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Reports duplicated blocks of code"
    }

    fn run(&self, ctx: &mut AnalysisContext) -> anyhow::Result<Vec<Diagnostic>> {
        let mut index = std::mem::take(ctx.state_mut().entry::<DuplIndex>());
        for file in ctx.files() {
            self.index_file(&mut index, file);
        }

        let mut diagnostics = Vec::new();
        for (path, mut windows) in duplicated_windows(&index) {
            windows.sort_by_key(|(lines, _)| (lines.from, lines.to));

            let mut block: Option<(LineRange, Location)> = None;
            for (lines, other) in windows {
                match &mut block {
                    Some((current, current_other))
                        if current.overlaps(&lines) || current.to + 1 == lines.from =>
                    {
                        current.to = current.to.max(lines.to);
                        if current_other.path == other.path {
                            current_other.lines.to = current_other.lines.to.max(other.lines.to);
                        }
                    }
                    _ => {
                        if let Some(done) = block.replace((lines, other)) {
                            diagnostics.push(report(&path, done));
                        }
                    }
                }
            }
            if let Some(done) = block {
                diagnostics.push(report(&path, done));
            }
        }

        log::debug!(
            "dupl indexed {} windows, {} duplicate blocks",
            index.len(),
            diagnostics.len()
        );
        *ctx.state_mut().entry::<DuplIndex>() = index;
        Ok(diagnostics)
    }
}

fn report(path: &PathBuf, (lines, other): (LineRange, Location)) -> Diagnostic {
    Diagnostic::new(
        path,
        lines.from,
        format!(
            "{}-{} lines are duplicate of `{}:{}-{}`",
            lines.from,
            lines.to,
            other.path.display(),
            other.lines.from,
            other.lines.to
        ),
    )
    .with_line_range(lines)
    .with_linter(NAME)
}
