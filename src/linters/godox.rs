//! Comments starting with a keyword such as TODO or FIXME.

use crate::config::GodoxSettings;
use crate::core::{Diagnostic, SourceFile};
use crate::linter::FileCheck;

pub const NAME: &str = "godox";

const COMMENT_MARKERS: &[&str] = &["//", "/*", "#"];

pub struct Godox {
    keywords: Vec<String>,
}

impl Godox {
    pub fn new(settings: &GodoxSettings) -> Self {
        Self {
            keywords: settings.keywords.iter().map(|k| k.to_uppercase()).collect(),
        }
    }

    fn keyword_list(&self) -> String {
        self.keywords.join("/")
    }
}

/// Start and text of the first comment on the line.
fn comment(line: &str) -> Option<(usize, &str)> {
    COMMENT_MARKERS
        .iter()
        .filter_map(|marker| line.find(marker).map(|pos| (pos, marker.len())))
        .min_by_key(|(pos, _)| *pos)
        .map(|(pos, len)| {
            let text = line[pos + len..].trim_start_matches(['/', '!', '*']);
            (pos, text.trim())
        })
}

impl FileCheck for Godox {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Reports comments starting with TODO, BUG or FIXME"
    }

    fn check(&self, file: &SourceFile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (idx, line) in file.lines().enumerate() {
            let Some((pos, text)) = comment(line) else {
                continue;
            };
            let upper = text.to_uppercase();
            if !self.keywords.iter().any(|k| upper.starts_with(k.as_str())) {
                continue;
            }
            let text = text.trim_end_matches("*/").trim_end();
            diagnostics.push(
                Diagnostic::new(
                    &file.path,
                    idx + 1,
                    format!("Line contains {}: {:?}", self.keyword_list(), text),
                )
                .with_column(line[..pos].chars().count() + 1),
            );
        }
        diagnostics
    }
}
