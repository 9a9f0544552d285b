use crate::core::Diagnostic;
use crate::errors::Result;
use crate::pipeline::stage::{transform_diagnostics, Stage};
use once_cell::sync::Lazy;
use regex::Regex;

struct Replacement {
    pattern: Regex,
    template: &'static str,
}

fn replacement(pattern: &str, template: &'static str) -> Replacement {
    Replacement {
        pattern: Regex::new(pattern).unwrap(),
        template,
    }
}

/// Message shapes whose identifiers get wrapped in backticks. Runs before
/// `exclude` so users write exclusions against the marked text.
static REPLACEMENTS: Lazy<Vec<Replacement>> = Lazy::new(|| {
    [
        (r"^unused variable (\w+)$", "unused variable `${1}`"),
        (r"^unused import (\S+)$", "unused import `${1}`"),
        (r"^(\w+) is never used$", "`${1}` is never used"),
        (r"^(\w+) redeclared in this block$", "`${1}` redeclared in this block"),
        (r"^undeclared name: (\w+)$", "undeclared name: `${1}`"),
        (
            r"^cannot find (value|type|function|module|crate) (\w+) in this scope$",
            "cannot find ${1} `${2}` in this scope",
        ),
        (
            r"^exported (type|method|function|var|const) (\S+) should have comment",
            "exported ${1} `${2}` should have comment",
        ),
        (
            r"^should replace (.+) with (.+)$",
            "should replace `${1}` with `${2}`",
        ),
        (
            r"^(\w+) should be (\w+)$",
            "`${1}` should be `${2}`",
        ),
    ]
    .into_iter()
    .map(|(pattern, template)| replacement(pattern, template))
    .collect()
});

/// Wraps identifiers of well-known message shapes in backticks.
pub struct IdentifierMarker;

impl IdentifierMarker {
    pub fn new() -> Self {
        Self
    }

    fn mark(message: &str) -> Option<String> {
        if message.contains('`') {
            return None;
        }
        REPLACEMENTS.iter().find_map(|r| {
            r.pattern
                .is_match(message)
                .then(|| r.pattern.replace(message, r.template).into_owned())
        })
    }
}

impl Default for IdentifierMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for IdentifierMarker {
    fn name(&self) -> &str {
        "identifier_marker"
    }

    fn process(&mut self, diagnostics: &[Diagnostic]) -> Result<Vec<Diagnostic>> {
        Ok(transform_diagnostics(diagnostics, |d| {
            if let Some(marked) = Self::mark(&d.message) {
                d.message = marked;
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_known_shapes() {
        assert_eq!(
            IdentifierMarker::mark("unused variable count").as_deref(),
            Some("unused variable `count`")
        );
        assert_eq!(
            IdentifierMarker::mark("cannot find value foo in this scope").as_deref(),
            Some("cannot find value `foo` in this scope")
        );
        assert_eq!(
            IdentifierMarker::mark("should replace x += 1 with x++").as_deref(),
            Some("should replace `x += 1` with `x++`")
        );
    }

    #[test]
    fn test_leaves_other_messages_alone() {
        let mut stage = IdentifierMarker::new();
        let input = [
            Diagnostic::new("a.rs", 1, "the line is 130 characters long"),
            Diagnostic::new("a.rs", 2, "unused variable `already`"),
        ];
        let out = stage.process(&input).unwrap();
        assert_eq!(out, input.to_vec());
    }

    #[test]
    fn test_every_message_shape_compiles() {
        assert_eq!(REPLACEMENTS.len(), 9);
    }
}
