//! The stage order every run uses.

use super::builder::{Pipeline, PipelineBuilder};
use super::stages::*;
use crate::config::Config;
use crate::core::AnalysisContext;
use crate::errors::Result;
use crate::registry::{LinterRegistry, COMPOSITE_LINTER_NAME};

/// Build the pipeline for `config` over the files of `ctx`.
///
/// Fails only on invalid patterns, which validation already rejects.
pub fn standard_pipeline(
    config: &Config,
    ctx: &AnalysisContext,
    registry: &LinterRegistry,
) -> Result<Pipeline> {
    let root = ctx.root();
    let issues = &config.issues;
    let prefix = config.output.path_prefix.as_str();
    let rule_files = RuleFiles::new(ctx.line_cache(), prefix);

    let extra_names = config
        .linters
        .custom
        .keys()
        .map(String::as_str)
        .chain([COMPOSITE_LINTER_NAME]);

    let diff_source = if let Some(patch) = &issues.new_from_patch {
        Some(DiffSource::Patch(patch.clone()))
    } else if issues.new || issues.new_from_rev.is_some() {
        Some(DiffSource::Git {
            root: root.to_path_buf(),
            revision: issues.new_from_rev.clone(),
        })
    } else {
        None
    };

    let pipeline = PipelineBuilder::new()
        .stage(BuildOutput::new(root, &config.run.build_dirs))
        .stage(FilenameUnadjuster::new(root, ctx.line_directives().clone()))
        .stage(PathPrettifier::new(root))
        .stage(SkipFiles::new(&config.run.skip_files, prefix)?)
        .stage(SkipDirs::new(
            &config.run.effective_skip_dirs(),
            root,
            ctx.args(),
            prefix,
        )?)
        .stage(AutogeneratedExclude::new(root, &issues.include_paths)?)
        .stage(IdentifierMarker::new())
        .stage(Exclude::new(&issues.exclude, issues.exclude_case_sensitive)?)
        .stage(ExcludeRules::new(
            &issues.exclude_rules,
            issues.exclude_case_sensitive,
            registry,
            rule_files.clone(),
        )?)
        .stage(Nolint::new(ctx.line_cache(), registry, extra_names))
        .stage(UniqByLine::new(issues.uniq_by_line && !issues.fix))
        .when(diff_source.is_some(), |p| match diff_source {
            Some(source) => p.stage(Diff::new(source, issues.whole_files)),
            None => p,
        })
        .stage(MaxPerFileFromLinter::new(
            &issues.max_per_file_from_linter,
            registry,
            issues.fix,
        ))
        .stage(MaxSameIssues::new(issues.max_same_issues, issues.fix))
        .stage(MaxFromLinter::new(issues.max_issues_per_linter, issues.fix))
        .stage(SourceCode::new(ctx.line_cache()))
        .stage(Severity::new(&config.severity, registry, rule_files)?)
        .stage(PathShortener::new(root))
        .stage(Fixer::new(root, issues.fix))
        .stage(PathPrefixer::new(prefix))
        .stage(SortResults)
        .build();

    log::debug!("Pipeline stages: {}", pipeline.stage_names().join(", "));
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linters::builtin_registry;

    #[test]
    fn test_stage_order() {
        let config = Config::default();
        let ctx = AnalysisContext::new("/work");
        let registry = builtin_registry(&config.linters_settings);
        let pipeline = standard_pipeline(&config, &ctx, &registry).unwrap();

        assert_eq!(
            pipeline.stage_names(),
            vec![
                "build_output",
                "filename_unadjuster",
                "path_prettifier",
                "skip_files",
                "skip_dirs",
                "autogenerated_exclude",
                "identifier_marker",
                "exclude",
                "exclude_rules",
                "nolint",
                "uniq_by_line",
                "max_per_file_from_linter",
                "max_same_issues",
                "max_from_linter",
                "source_code",
                "severity",
                "path_shortener",
                "fixer",
                "path_prefixer",
                "sort_results",
            ]
        );
    }

    #[test]
    fn test_diff_stage_in_diff_mode() {
        let mut config = Config::default();
        config.issues.new_from_patch = Some("changes.patch".into());
        let ctx = AnalysisContext::new("/work");
        let registry = builtin_registry(&config.linters_settings);
        let pipeline = standard_pipeline(&config, &ctx, &registry).unwrap();

        let names = pipeline.stage_names();
        let diff = names.iter().position(|n| *n == "diff").unwrap();
        assert_eq!(names[diff - 1], "uniq_by_line");
        assert_eq!(names[diff + 1], "max_per_file_from_linter");
    }
}
