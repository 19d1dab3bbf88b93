//! PDF document outline (bookmarks) flattening.
//!
//! Walks the outline tree in document order (pre-order, depth-first, siblings
//! in their linked order) and produces one [`BookmarkRecord`] per item.
//!
//! Every visited item is recorded, including items whose destination cannot
//! be resolved; those carry `page_number: None`. Cyclic outlines are detected
//! and the repeated item is skipped.

use crate::document::SourceDocument;
use lopdf::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Title used for outline items with an empty or blank title.
pub const UNTITLED_BOOKMARK: &str = "[Untitled Bookmark]";

/// A single flattened outline item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    /// The title of this bookmark
    pub title: String,

    /// One-based page number, `None` if the destination could not be resolved
    pub page_number: Option<u32>,

    /// Outline depth, zero for top-level items
    pub level: usize,
}

impl BookmarkRecord {
    /// Whether the destination resolved to a page.
    pub fn is_resolved(&self) -> bool {
        self.page_number.is_some()
    }
}

/// Flatten the outline of `doc`.
///
/// Returns an empty vector when the document has no outline.
pub fn flatten_outline(doc: &SourceDocument) -> Vec<BookmarkRecord> {
    match doc.outline_root() {
        Some(first) => flatten_from(doc, first),
        None => Vec::new(),
    }
}

/// Flatten the outline starting at the top-level item `first`.
///
/// Uses an explicit stack of sibling cursors: popping a cursor visits the
/// item, then pushes its next sibling followed by its first child, so the
/// child subtree is fully emitted before the sibling.
pub fn flatten_from(doc: &SourceDocument, first: ObjectId) -> Vec<BookmarkRecord> {
    let mut records = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(ObjectId, usize)> = vec![(first, 0)];

    while let Some((id, level)) = stack.pop() {
        if !visited.insert(id) {
            log::warn!(
                "Outline item {} {} R reached twice (cyclic outline), skipping",
                id.0,
                id.1
            );
            continue;
        }

        let node = match doc.node(id) {
            Some(node) => node,
            None => {
                log::warn!("Outline item {} {} R is missing or not a dictionary", id.0, id.1);
                continue;
            },
        };

        let title = match node.title() {
            Some(title) if !title.trim().is_empty() => title,
            _ => {
                log::warn!("Found an untitled bookmark at outline level {}", level);
                UNTITLED_BOOKMARK.to_string()
            },
        };

        let target = node.target();
        let page_number = target.resolve(doc);
        match page_number {
            Some(page) => log::debug!("Bookmark '{}' (level {}) -> page {}", title, level, page),
            None => log::warn!(
                "Could not resolve page for bookmark '{}' at level {}: {}",
                title,
                level,
                target.describe()
            ),
        }

        records.push(BookmarkRecord {
            title,
            page_number,
            level,
        });

        if let Some(next) = node.next_sibling() {
            stack.push((next, level));
        }
        if let Some(child) = node.first_child() {
            stack.push((child, level + 1));
        }
    }

    log::info!("Extracted {} bookmarks", records.len());
    records
}
