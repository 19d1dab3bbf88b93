//! Zip packaging of exported chapters.
//!
//! Entries are written in the order they are added. Each entry is fully
//! written and flushed before the next one starts, and the central directory
//! is written once by [`ArchivePackager::finish`].

use crate::error::Result;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// In-memory zip archive builder.
pub struct ArchivePackager {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl Default for ArchivePackager {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchivePackager {
    /// Create an empty archive using deflate compression.
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether no entries have been written.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write one named entry.
    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(bytes)?;
        self.zip.flush()?;
        self.entries += 1;
        log::debug!("Added archive entry '{}' ({} bytes)", name, bytes.len());
        Ok(())
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Package an ordered sequence of `(file name, bytes)` pairs.
pub fn package<N, B>(entries: impl IntoIterator<Item = (N, B)>) -> Result<Vec<u8>>
where
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let mut packager = ArchivePackager::new();
    for (name, bytes) in entries {
        packager.add_entry(name.as_ref(), bytes.as_ref())?;
    }
    packager.finish()
}
