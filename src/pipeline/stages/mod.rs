//! Concrete pipeline stages, one per file, in pipeline order.

pub mod autogenerated_exclude;
pub mod build_output;
pub mod diff;
pub mod exclude;
pub mod exclude_rules;
pub mod filename_unadjuster;
pub mod fixer;
pub mod identifier_marker;
pub mod max_from_linter;
pub mod max_per_file_from_linter;
pub mod max_same_issues;
pub mod nolint;
pub mod path_prefixer;
pub mod path_prettifier;
pub mod path_shortener;
pub mod rules;
pub mod severity;
pub mod skip_dirs;
pub mod skip_files;
pub mod sort_results;
pub mod source_code;
pub mod uniq_by_line;

pub use autogenerated_exclude::AutogeneratedExclude;
pub use build_output::BuildOutput;
pub use diff::{Diff, DiffSource};
pub use exclude::Exclude;
pub use exclude_rules::ExcludeRules;
pub use filename_unadjuster::FilenameUnadjuster;
pub use fixer::Fixer;
pub use identifier_marker::IdentifierMarker;
pub use max_from_linter::MaxFromLinter;
pub use max_per_file_from_linter::MaxPerFileFromLinter;
pub use max_same_issues::MaxSameIssues;
pub use nolint::Nolint;
pub use path_prefixer::PathPrefixer;
pub use path_prettifier::PathPrettifier;
pub use path_shortener::PathShortener;
pub use rules::{RuleFiles, RuleMatcher};
pub use severity::Severity;
pub use skip_dirs::SkipDirs;
pub use skip_files::SkipFiles;
pub use sort_results::SortResults;
pub use source_code::SourceCode;
pub use uniq_by_line::UniqByLine;
