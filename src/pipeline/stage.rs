//! The contract of one diagnostic transformation.

use crate::core::Diagnostic;
use crate::errors::Result;

/// One step of the diagnostic pipeline.
///
/// A stage owns whatever caches it needs; they live as long as the pipeline
/// holding the stage. A stage reports failure with `Err`: the pipeline logs
/// it and passes the stage's input through unchanged.
pub trait Stage: Send {
    /// Stable identifier used in logs and statistics.
    fn name(&self) -> &str;

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>>;

    /// Called once after the whole pipeline ran. Summary logging only.
    fn finish(&mut self) {}
}

/// Clone the diagnostics `keep` accepts.
pub(crate) fn filter_diagnostics(
    diagnostics: &[Diagnostic],
    mut keep: impl FnMut(&Diagnostic) -> bool,
) -> Vec<Diagnostic> {
    diagnostics.iter().filter(|d| keep(d)).cloned().collect()
}

/// Like [`filter_diagnostics`], failing on the first error.
pub(crate) fn try_filter_diagnostics(
    diagnostics: &[Diagnostic],
    mut keep: impl FnMut(&Diagnostic) -> Result<bool>,
) -> Result<Vec<Diagnostic>> {
    let mut kept = Vec::with_capacity(diagnostics.len());
    for d in diagnostics {
        if keep(d)? {
            kept.push(d.clone());
        }
    }
    Ok(kept)
}

/// Clone every diagnostic and apply `f` to the copy.
pub(crate) fn transform_diagnostics(
    diagnostics: &[Diagnostic],
    mut f: impl FnMut(&mut Diagnostic),
) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .cloned()
        .map(|mut d| {
            f(&mut d);
            d
        })
        .collect()
}
