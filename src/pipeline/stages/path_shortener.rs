use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{transform_diagnostics, Stage};
use std::path::Path;

/// Strips the working directory from diagnostic messages.
pub struct PathShortener {
    prefix: String,
}

impl PathShortener {
    pub fn new(root: &Path) -> Self {
        let mut prefix = root.to_string_lossy().into_owned();
        if !prefix.ends_with(std::path::MAIN_SEPARATOR) {
            prefix.push(std::path::MAIN_SEPARATOR);
        }
        Self { prefix }
    }
}

impl Stage for PathShortener {
    fn name(&self) -> &str {
        "path_shortener"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        Ok(transform_diagnostics(diagnostics, |d| {
            if d.message.contains(&self.prefix) {
                d.message = d.message.replace(&self.prefix, "");
            }
        }))
    }
}
