// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Chapters
//!
//! Extract the outline (bookmarks) of a PDF and split the document into one
//! PDF per chapter, packaged as a zip archive.
//!
//! ## Core Features
//!
//! - **Outline extraction**: pre-order flattening of the bookmark tree with
//!   resolved one-based page numbers and zero-based levels
//! - **Destination resolution**: explicit page references, raw page numbers,
//!   named destinations (name tree and legacy `/Dests`), GoTo actions
//! - **Chapter splitting**: contiguous, non-overlapping page ranges from the
//!   bookmarks at any outline level
//! - **Packaging**: deterministic, filesystem-safe entry names
//!   (`001-Intro.pdf`, `002-Part One.pdf`, ...)
//!
//! ## Architecture
//!
//! ```text
//! PDF bytes -> document (load) -> outline (flatten, via destination)
//!           -> partition -> export (per chapter) -> archive -> zip bytes
//! ```
//!
//! PDF parsing and serialization are done by [`lopdf`], wrapped by the
//! [`document`] module.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_chapters::{extract_outline, split_by_outline, SplitOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("book.pdf")?;
//!
//! for bookmark in extract_outline(&bytes)? {
//!     println!("{}{} -> {:?}", "  ".repeat(bookmark.level), bookmark.title, bookmark.page_number);
//! }
//!
//! let options = SplitOptions::new().with_bookmark_level(1).with_source_name("book.pdf");
//! let outcome = split_by_outline(&bytes, &options)?;
//! std::fs::write(&outcome.archive_name, &outcome.archive)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Document library layer
pub mod document;

// Outline handling
pub mod destination;
pub mod outline;

// Chapter splitting
pub mod archive;
pub mod export;
pub mod partition;

// Operations
pub mod split;

// Configuration
pub mod config;

// Re-exports
pub use config::SplitOptions;
pub use error::{Error, Result};
pub use outline::BookmarkRecord;
pub use partition::ChapterRange;
pub use split::{extract_outline, split_by_outline, EmptyReason, SplitOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
