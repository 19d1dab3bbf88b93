//! Error types for outline extraction and chapter splitting.
//!
//! Invalid requests (empty input, bad level) are separated from server-side
//! failures (unreadable documents, serialization and archive errors) so callers
//! can map them onto their own transport.

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting outlines or splitting documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or empty input document
    #[error("Input document is empty")]
    EmptyInput,

    /// Requested outline level is below 1
    #[error("Invalid bookmark level {0}: levels start at 1")]
    InvalidLevel(i64),

    /// The document library could not parse the input bytes
    #[error("Unreadable PDF document: {0}")]
    UnreadableDocument(String),

    /// A chapter sub-document could not be serialized
    #[error("Failed to export chapter '{chapter}': {reason}")]
    Export {
        /// File name of the chapter being exported
        chapter: String,
        /// Reason reported by the document library
        reason: String,
    },

    /// Zip archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the request itself rather than by
    /// processing it.
    ///
    /// Invalid requests are rejected before any document is opened.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::EmptyInput | Error::InvalidLevel(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::UnreadableDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_error() {
        let err = Error::InvalidLevel(0);
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid bookmark level 0"));
        assert!(err.is_invalid_request());
    }

    #[test]
    fn test_empty_input_is_invalid_request() {
        assert!(Error::EmptyInput.is_invalid_request());
    }

    #[test]
    fn test_export_error_is_server_side() {
        let err = Error::Export {
            chapter: "001-Intro.pdf".to_string(),
            reason: "disk full".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("001-Intro.pdf"));
        assert!(msg.contains("disk full"));
        assert!(!err.is_invalid_request());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).contains("missing"));
    }

    #[test]
    fn test_unreadable_document_error() {
        let err = Error::UnreadableDocument("bad header".to_string());
        assert!(format!("{}", err).contains("bad header"));
        assert!(!err.is_invalid_request());
    }
}
