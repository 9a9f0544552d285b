//! Named, curated groups of linters.
//!
//! # Example
//!
//! ```rust
//! use lintmux::registry::presets::Preset;
//!
//! assert_eq!(Preset::parse("style"), Some(Preset::Style));
//! assert_eq!(Preset::Bugs.as_str(), "bugs");
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Bugs,
    Comment,
    Complexity,
    Error,
    Format,
    Import,
    Metalinter,
    Module,
    Performance,
    Sql,
    Style,
    Test,
    Unused,
}

impl Preset {
    pub const ALL: [Preset; 13] = [
        Preset::Bugs,
        Preset::Comment,
        Preset::Complexity,
        Preset::Error,
        Preset::Format,
        Preset::Import,
        Preset::Metalinter,
        Preset::Module,
        Preset::Performance,
        Preset::Sql,
        Preset::Style,
        Preset::Test,
        Preset::Unused,
    ];

    /// Parse a preset name (exact, lowercase).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Bugs => "bugs",
            Preset::Comment => "comment",
            Preset::Complexity => "complexity",
            Preset::Error => "error",
            Preset::Format => "format",
            Preset::Import => "import",
            Preset::Metalinter => "metalinter",
            Preset::Module => "module",
            Preset::Performance => "performance",
            Preset::Sql => "sql",
            Preset::Style => "style",
            Preset::Test => "test",
            Preset::Unused => "unused",
        }
    }

    /// All preset names joined with `|`, for error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::parse(s).ok_or_else(|| {
            format!(
                "no such preset {:?}: only next presets exist: ({})",
                s,
                Preset::names()
            )
        })
    }
}
