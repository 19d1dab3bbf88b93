//! Per-chapter sub-document export.

use crate::document::{SourceDocument, SubDocument};
use crate::error::{Error, Result};
use crate::partition::ChapterRange;

/// Build a PDF holding pages `start_page..=end_page` of `source`, in order,
/// and serialize it.
///
/// A page index found out of bounds stops appending for this chapter; the
/// pages appended so far are still exported.
///
/// # Errors
///
/// Returns [`Error::Export`] if the sub-document cannot be serialized.
pub fn export_chapter(source: &SourceDocument, range: &ChapterRange) -> Result<Vec<u8>> {
    let mut page_ids = Vec::with_capacity(range.page_count());
    for index in range.start_page..=range.end_page {
        match source.page_id(index) {
            Some(id) => page_ids.push(id),
            None => {
                log::warn!(
                    "Chapter '{}': page {} is out of bounds ({} pages), stopping early",
                    range.file_name(),
                    index + 1,
                    source.page_count()
                );
                break;
            },
        }
    }

    let mut sub = SubDocument::new(source);
    sub.reserve_pages(&page_ids);
    for page_id in page_ids {
        sub.append_page(source, page_id)?;
    }

    log::debug!(
        "Exporting '{}' with {} pages ({}-{})",
        range.file_name(),
        sub.page_count(),
        range.start_page + 1,
        range.end_page + 1
    );

    sub.to_bytes().map_err(|e| Error::Export {
        chapter: range.file_name(),
        reason: e.to_string(),
    })
}
