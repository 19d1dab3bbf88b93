//! Chapter partitioning.
//!
//! Turns the flattened outline into contiguous, non-overlapping page ranges:
//! the bookmarks at one outline level are sorted by page and each one runs
//! until the page before the next one (the last runs to the end of the
//! document).

use crate::error::{Error, Result};
use crate::outline::BookmarkRecord;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Anything outside the filename-safe set.
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._\- ]").unwrap();
}

/// A contiguous page range exported as one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRange {
    /// Title sanitized for use in a file name
    pub title: String,

    /// Title of the bookmark the chapter starts at
    pub bookmark_title: String,

    /// First page, zero-based inclusive
    pub start_page: usize,

    /// Last page, zero-based inclusive
    pub end_page: usize,

    /// One-based position among exported chapters
    pub ordinal: usize,
}

impl ChapterRange {
    /// Archive entry name, e.g. `002-Part One.pdf`.
    pub fn file_name(&self) -> String {
        format!("{:03}-{}.pdf", self.ordinal, self.title)
    }

    /// Number of pages covered, zero when `end_page < start_page`.
    pub fn page_count(&self) -> usize {
        if self.end_page < self.start_page {
            return 0;
        }
        self.end_page - self.start_page + 1
    }
}

/// Strip a title down to letters, digits, `.`, `-`, `_` and spaces.
///
/// Falls back to `Chapter_<ordinal>` when nothing is left.
pub fn sanitize_title(title: &str, ordinal: usize) -> String {
    let cleaned = strip_unsafe_chars(title);
    if cleaned.is_empty() {
        format!("Chapter_{}", ordinal)
    } else {
        cleaned
    }
}

/// Remove characters outside the filename-safe set and trim.
pub(crate) fn strip_unsafe_chars(text: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(text, "").trim().to_string()
}

/// Split a document of `total_pages` pages at the bookmarks of one outline
/// level.
///
/// `level` is one-based: level 1 selects top-level bookmarks. Unresolved
/// bookmarks are ignored. Ties on the start page keep outline order; since a
/// range ends one page before the next start, all but the last of a group of
/// tied bookmarks come out empty and are skipped.
///
/// # Errors
///
/// Returns [`Error::InvalidLevel`] if `level < 1`.
pub fn partition(
    records: &[BookmarkRecord],
    level: i64,
    total_pages: usize,
) -> Result<Vec<ChapterRange>> {
    if level < 1 {
        return Err(Error::InvalidLevel(level));
    }
    let depth = (level - 1) as usize;

    let mut selected: Vec<(usize, &str)> = records
        .iter()
        .filter(|record| record.level == depth)
        .filter_map(|record| match record.page_number {
            Some(page) if page >= 1 => Some((page as usize - 1, record.title.as_str())),
            _ => None,
        })
        .collect();
    // sort_by_key is stable
    selected.sort_by_key(|(start, _)| *start);

    if selected.is_empty() {
        log::info!("No resolved bookmarks found at level {}", level);
        return Ok(Vec::new());
    }

    let Some(last_page) = total_pages.checked_sub(1) else {
        log::warn!("Document has no pages, skipping all {} chapters", selected.len());
        return Ok(Vec::new());
    };

    let mut chapters = Vec::with_capacity(selected.len());
    for (i, &(start, title)) in selected.iter().enumerate() {
        let end = match selected.get(i + 1) {
            Some(&(next_start, _)) => match next_start.checked_sub(1) {
                Some(end) => end.min(last_page),
                None => {
                    log::warn!("Skipping chapter '{}': empty page range", title);
                    continue;
                },
            },
            None => last_page,
        };

        if start > last_page {
            log::warn!(
                "Skipping chapter '{}': start page {} is beyond the last page {}",
                title,
                start + 1,
                total_pages
            );
            continue;
        }
        if start > end {
            log::warn!(
                "Skipping chapter '{}': empty page range (start {} > end {})",
                title,
                start + 1,
                end + 1
            );
            continue;
        }

        let ordinal = chapters.len() + 1;
        chapters.push(ChapterRange {
            title: sanitize_title(title, ordinal),
            bookmark_title: title.to_string(),
            start_page: start,
            end_page: end,
            ordinal,
        });
    }

    log::info!(
        "Partitioned {} pages into {} chapters at level {}",
        total_pages,
        chapters.len(),
        level
    );
    Ok(chapters)
}
