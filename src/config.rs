//! Configuration for splitting documents by outline level.

use crate::partition::strip_unsafe_chars;

/// Default one-based outline level to split at.
pub const DEFAULT_BOOKMARK_LEVEL: i64 = 1;

/// Base name used for archives when the caller gives no source name.
pub const DEFAULT_ARCHIVE_BASE: &str = "document";

/// Options for [`split_by_outline`](crate::split_by_outline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// One-based outline level to split at (1 = top-level bookmarks).
    ///
    /// Kept signed so out-of-range requests can be rejected instead of
    /// wrapping.
    pub bookmark_level: i64,

    /// Copy document metadata into each chapter.
    ///
    /// Reserved; currently has no effect.
    pub include_metadata: bool,

    /// Allow a page to appear in more than one chapter.
    ///
    /// Reserved; currently has no effect.
    pub allow_duplicates: bool,

    /// Name of the uploaded file, used to derive the archive name.
    pub source_name: Option<String>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self {
            bookmark_level: DEFAULT_BOOKMARK_LEVEL,
            include_metadata: false,
            allow_duplicates: false,
            source_name: None,
        }
    }

    /// Set the one-based outline level.
    pub fn with_bookmark_level(mut self, level: i64) -> Self {
        self.bookmark_level = level;
        self
    }

    /// Set the include-metadata flag.
    pub fn with_include_metadata(mut self, enable: bool) -> Self {
        self.include_metadata = enable;
        self
    }

    /// Set the allow-duplicates flag.
    pub fn with_allow_duplicates(mut self, enable: bool) -> Self {
        self.allow_duplicates = enable;
        self
    }

    /// Set the source file name.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Base for archive names: the source file stem, sanitized, or
    /// `"document"`.
    pub fn archive_base(&self) -> String {
        self.source_name
            .as_deref()
            .map(|name| {
                let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
                let stem = match name.rsplit_once('.') {
                    Some((stem, _)) if !stem.is_empty() => stem,
                    _ => name,
                };
                strip_unsafe_chars(stem)
            })
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_BASE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SplitOptions::default();
        assert_eq!(options.bookmark_level, 1);
        assert!(!options.include_metadata);
        assert!(!options.allow_duplicates);
        assert_eq!(options.archive_base(), "document");
    }

    #[test]
    fn test_builder() {
        let options = SplitOptions::new()
            .with_bookmark_level(2)
            .with_include_metadata(true)
            .with_allow_duplicates(true)
            .with_source_name("report.pdf");
        assert_eq!(options.bookmark_level, 2);
        assert!(options.include_metadata);
        assert!(options.allow_duplicates);
        assert_eq!(options.source_name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_archive_base() {
        let base = |name: &str| SplitOptions::new().with_source_name(name).archive_base();
        assert_eq!(base("annual report.pdf"), "annual report");
        assert_eq!(base("/tmp/uploads/book.v2.pdf"), "book.v2");
        assert_eq!(base("C:\\docs\\manual.pdf"), "manual");
        assert_eq!(base("noext"), "noext");
        assert_eq!(base("???.pdf"), "document");
    }
}
