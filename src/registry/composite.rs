//! Merging of incremental linters into one pass over the files.

use crate::linter::{FileCheck, FileCheckLinter, LinterConfig, LoadMode};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const COMPOSITE_LINTER_NAME: &str = "composite";

/// Replace every incremental linter (per-file checks, not whole-program) in
/// `linters` by a single composite linter running all their checks.
///
/// Nothing changes when fewer than two linters qualify. Diagnostics of the
/// composite keep the name of the check that produced them.
pub fn combine_incremental_linters(linters: &mut BTreeMap<String, LinterConfig>) {
    let eligible: Vec<(String, Vec<Arc<dyn FileCheck>>)> = linters
        .iter()
        .filter(|(_, lc)| lc.load_mode != LoadMode::WholeProgram)
        .filter_map(|(name, lc)| lc.linter.file_checks().map(|checks| (name.clone(), checks)))
        .collect();

    if eligible.len() <= 1 {
        log::debug!(
            "Didn't combine incremental linters: got only {} linters",
            eligible.len()
        );
        return;
    }

    let mut checks = Vec::new();
    let mut presets = Vec::new();
    let mut load_mode = LoadMode::Syntax;
    let mut is_slow = false;
    let mut mutates_shared_state = false;
    for (name, linter_checks) in &eligible {
        if let Some(lc) = linters.remove(name) {
            presets.extend(lc.presets.iter().copied());
            load_mode = load_mode.max(lc.load_mode);
            is_slow |= lc.is_slow;
            mutates_shared_state |= lc.mutates_shared_state;
        }
        checks.extend(linter_checks.iter().cloned());
    }
    presets.sort();
    presets.dedup();

    let composite = FileCheckLinter::composite(
        COMPOSITE_LINTER_NAME,
        format!(
            "Runs {} in a single pass",
            eligible
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        checks,
    );

    let mut config = LinterConfig::new(Arc::new(composite))
        .with_presets(&presets)
        .with_load_mode(load_mode);
    config.is_slow = is_slow;
    config.mutates_shared_state = mutates_shared_state;

    log::debug!(
        "Combined {} incremental linters into one composite linter",
        eligible.len()
    );
    linters.insert(COMPOSITE_LINTER_NAME.to_string(), config);
}
