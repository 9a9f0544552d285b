pub mod line_cache;
pub mod patch;

pub use line_cache::LineCache;
pub use patch::ChangedLines;

use std::path::{Path, PathBuf};

/// Join an output path prefix in front of a relative path.
pub fn with_path_prefix(prefix: &str, path: &Path) -> PathBuf {
    if prefix.is_empty() {
        path.to_path_buf()
    } else {
        Path::new(prefix).join(path)
    }
}

/// Path rendered with `/` separators. User path patterns are matched
/// against this form only, never rewritten per platform.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path_prefix() {
        assert_eq!(
            with_path_prefix("", Path::new("src/a.rs")),
            PathBuf::from("src/a.rs")
        );
        assert_eq!(
            with_path_prefix("crates/core", Path::new("src/a.rs")),
            PathBuf::from("crates/core/src/a.rs")
        );
    }

    #[test]
    fn test_slash_path() {
        assert_eq!(slash_path(Path::new("a/b.rs")), "a/b.rs");
        assert_eq!(slash_path(Path::new(r"vendor\lib\a.rs")), "vendor/lib/a.rs");
    }
}
