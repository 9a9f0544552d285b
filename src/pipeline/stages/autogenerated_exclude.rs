use crate::core::Diagnostic;
use crate::errors::{compile_regex, Error, Result};
use crate::io::line_cache::{read_capped_line, MAX_LINE_BYTES};
use crate::io::slash_path;
use crate::pipeline::stage::{try_filter_diagnostics, Stage};
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const GENERATED_MARKERS: &[&str] = &[
    "code generated",
    "do not edit",
    "autogenerated file",
    "@generated",
];

/// Linter whose diagnostics stay visible in generated files.
const TYPECHECK_LINTER: &str = "typecheck";

/// Drops diagnostics reported in generated files.
pub struct AutogeneratedExclude {
    root: PathBuf,
    include_paths: Vec<Regex>,
    generated: HashMap<PathBuf, bool>,
    excluded: usize,
}

impl AutogeneratedExclude {
    pub fn new(root: impl Into<PathBuf>, include_paths: &[String]) -> Result<Self> {
        let include_paths = include_paths
            .iter()
            .map(|p| compile_regex(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            root: root.into(),
            include_paths,
            generated: HashMap::new(),
            excluded: 0,
        })
    }

    fn should_pass(&mut self, d: &Diagnostic) -> Result<bool> {
        if d.from_linter == TYPECHECK_LINTER {
            return Ok(true);
        }

        let path = slash_path(&d.file_path);
        if self.include_paths.iter().any(|p| p.is_match(&path)) {
            return Ok(true);
        }

        if is_special_generated_file(&d.file_path) {
            return Ok(false);
        }

        Ok(!self.is_generated(&d.file_path)?)
    }

    fn is_generated(&mut self, path: &Path) -> Result<bool> {
        if let Some(&generated) = self.generated.get(path) {
            return Ok(generated);
        }
        // Memoized before reading: an unreadable file is reported once.
        self.generated.insert(path.to_path_buf(), false);

        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let doc = leading_doc(&full).map_err(|e| {
            Error::stage(
                "autogenerated_exclude",
                format!("failed to get doc of file {}: {e}", path.display()),
            )
        })?;

        let generated = is_generated_doc(&doc);
        log::debug!("file {} is generated: {}", path.display(), generated);
        self.generated.insert(path.to_path_buf(), generated);
        Ok(generated)
    }
}

/// Fake files `//line` directives of yacc-generated parsers point to.
fn is_special_generated_file(path: &Path) -> bool {
    matches!(
        path.file_name().and_then(|n| n.to_str()),
        Some("yacctab" | "yaccpar" | "NONE")
    )
}

fn is_generated_doc(doc: &str) -> bool {
    let doc = doc.to_lowercase();
    GENERATED_MARKERS.iter().any(|marker| doc.contains(marker))
}

/// Comment text of the file's leading block.
///
/// The block is made of blank lines, `//` comments and module declarations;
/// it ends at the first other line or at a line longer than the read cap.
fn leading_doc(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut doc = Vec::new();

    while let Some(line) = read_capped_line(&mut reader, MAX_LINE_BYTES)? {
        if line.truncated {
            break;
        }
        let text = line.text.trim();
        if let Some(comment) = text.strip_prefix("//") {
            doc.push(comment.trim_start_matches(['/', '!']).trim().to_string());
        } else if text.is_empty() || is_module_declaration(text) {
            continue;
        } else {
            break;
        }
    }

    Ok(doc.join("\n"))
}

fn is_module_declaration(line: &str) -> bool {
    ["package ", "module ", "mod ", "pub mod "]
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

impl Stage for AutogeneratedExclude {
    fn name(&self) -> &str {
        "autogenerated_exclude"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        let kept = try_filter_diagnostics(diagnostics, |d| self.should_pass(d))?;
        self.excluded += diagnostics.len() - kept.len();
        Ok(kept)
    }

    fn finish(&mut self) {
        if self.excluded > 0 {
            let files = self.generated.values().filter(|g| **g).count();
            log::info!(
                "Excluded {} issues in {} generated files",
                self.excluded,
                files
            );
        }
    }
}
