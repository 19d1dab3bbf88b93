//! The extract-outline and split-by-outline operations.
//!
//! Both operations take raw PDF bytes. Invalid requests are rejected before
//! the document is opened. A document without an outline, or without
//! bookmarks at the requested level, is a successful split with zero
//! chapters and a descriptive archive name.

use crate::archive::ArchivePackager;
use crate::config::SplitOptions;
use crate::document::SourceDocument;
use crate::error::{Error, Result};
use crate::export::export_chapter;
use crate::outline::{flatten_outline, BookmarkRecord};
use crate::partition::{partition, ChapterRange};
use serde::{Deserialize, Serialize};

/// Why a split produced no chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "level", rename_all = "snake_case")]
pub enum EmptyReason {
    /// The document has no outline
    NoOutline,

    /// No resolved bookmarks exist at the requested one-based level
    NoBookmarksAtLevel(i64),

    /// Bookmarks exist at the level, but every one of them starts beyond the
    /// last page or shares its start page with a later bookmark
    NoPagesAtLevel(i64),
}

impl EmptyReason {
    fn archive_suffix(&self) -> String {
        match self {
            EmptyReason::NoOutline => "no_outline".to_string(),
            EmptyReason::NoBookmarksAtLevel(level) | EmptyReason::NoPagesAtLevel(level) => {
                format!("no_chapters_at_level_{}", level)
            },
        }
    }
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyReason::NoOutline => write!(f, "document has no outline"),
            EmptyReason::NoBookmarksAtLevel(level) => {
                write!(f, "no bookmarks found at level {}", level)
            },
            EmptyReason::NoPagesAtLevel(level) => {
                write!(f, "bookmarks at level {} cover no pages of the document", level)
            },
        }
    }
}

/// Result of [`split_by_outline`].
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Suggested file name for the archive
    pub archive_name: String,

    /// Zip archive bytes
    pub archive: Vec<u8>,

    /// Chapters written to the archive, in archive order
    pub chapters: Vec<ChapterRange>,

    /// Set when the archive is empty
    pub empty_reason: Option<EmptyReason>,
}

impl SplitOutcome {
    /// Whether any chapter was exported.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    fn empty(base: &str, reason: EmptyReason) -> Result<Self> {
        log::info!("Returning empty archive: {}", reason);
        Ok(Self {
            archive_name: format!("{}_{}.zip", base, reason.archive_suffix()),
            archive: ArchivePackager::new().finish()?,
            chapters: Vec::new(),
            empty_reason: Some(reason),
        })
    }
}

/// Extract the flattened outline of a PDF.
///
/// Returns an empty vector when the document has no outline.
///
/// # Errors
///
/// - [`Error::EmptyInput`] for empty input
/// - [`Error::UnreadableDocument`] if the bytes cannot be parsed
pub fn extract_outline(bytes: &[u8]) -> Result<Vec<BookmarkRecord>> {
    let doc = SourceDocument::load(bytes)?;
    if doc.outline_root().is_none() {
        log::info!("Document has no outline (bookmarks)");
    }
    Ok(flatten_outline(&doc))
}

/// Split a PDF into one sub-document per bookmark at
/// `options.bookmark_level` and package them into a zip archive.
///
/// # Errors
///
/// - [`Error::EmptyInput`] or [`Error::InvalidLevel`] for invalid requests,
///   before the document is opened
/// - [`Error::UnreadableDocument`] if the bytes cannot be parsed
/// - [`Error::Export`], [`Error::Archive`] or [`Error::Io`] if writing fails;
///   no partial archive is returned
pub fn split_by_outline(bytes: &[u8], options: &SplitOptions) -> Result<SplitOutcome> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if options.bookmark_level < 1 {
        return Err(Error::InvalidLevel(options.bookmark_level));
    }
    if options.include_metadata || options.allow_duplicates {
        log::debug!(
            "include_metadata={} allow_duplicates={} are accepted but not applied",
            options.include_metadata,
            options.allow_duplicates
        );
    }

    let base = options.archive_base();
    let doc = SourceDocument::load(bytes)?;

    if doc.outline_root().is_none() {
        return SplitOutcome::empty(&base, EmptyReason::NoOutline);
    }

    let records = flatten_outline(&doc);
    let chapters = partition(&records, options.bookmark_level, doc.page_count())?;
    if chapters.is_empty() {
        let depth = (options.bookmark_level - 1) as usize;
        let has_bookmarks = records
            .iter()
            .any(|record| record.level == depth && record.is_resolved());
        let reason = if has_bookmarks {
            EmptyReason::NoPagesAtLevel(options.bookmark_level)
        } else {
            EmptyReason::NoBookmarksAtLevel(options.bookmark_level)
        };
        return SplitOutcome::empty(&base, reason);
    }

    let mut packager = ArchivePackager::new();
    for chapter in &chapters {
        let pdf = export_chapter(&doc, chapter)?;
        packager.add_entry(&chapter.file_name(), &pdf)?;
    }
    let archive = packager.finish()?;

    log::info!(
        "Split {} pages into {} chapters at level {} ({} bytes)",
        doc.page_count(),
        chapters.len(),
        options.bookmark_level,
        archive.len()
    );

    Ok(SplitOutcome {
        archive_name: format!("{}_chapters.zip", base),
        archive,
        chapters,
        empty_reason: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(extract_outline(&[]), Err(Error::EmptyInput)));
        assert!(matches!(
            split_by_outline(&[], &SplitOptions::default()),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_level_checked_before_parsing() {
        // Garbage bytes: an InvalidLevel error proves the document was never opened.
        let options = SplitOptions::new().with_bookmark_level(0);
        assert!(matches!(
            split_by_outline(b"not a pdf", &options),
            Err(Error::InvalidLevel(0))
        ));
        let options = SplitOptions::new().with_bookmark_level(-2);
        assert!(matches!(
            split_by_outline(b"not a pdf", &options),
            Err(Error::InvalidLevel(-2))
        ));
    }

    #[test]
    fn test_unreadable_document() {
        let result = split_by_outline(b"not a pdf", &SplitOptions::default());
        assert!(matches!(result, Err(Error::UnreadableDocument(_))));
    }

    #[test]
    fn test_empty_reason_names() {
        assert_eq!(EmptyReason::NoOutline.archive_suffix(), "no_outline");
        assert_eq!(
            EmptyReason::NoBookmarksAtLevel(3).archive_suffix(),
            "no_chapters_at_level_3"
        );
        assert_eq!(
            EmptyReason::NoBookmarksAtLevel(2).to_string(),
            "no bookmarks found at level 2"
        );
        assert_eq!(
            EmptyReason::NoPagesAtLevel(1).archive_suffix(),
            "no_chapters_at_level_1"
        );
        assert_eq!(
            EmptyReason::NoPagesAtLevel(1).to_string(),
            "bookmarks at level 1 cover no pages of the document"
        );
    }
}
