//! Error types for the field mapping library.
//!
//! Only I/O-class failures are errors here. Degenerate rectangles and malformed
//! mapping attributes are recovered with defaults and never reach this type.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, composing, or caching PDFs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF could not be parsed or serialized
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// A merge was requested with no sources
    #[error("No PDF sources supplied")]
    EmptyInput,

    /// A data URI did not have the `data:[<mime>][;base64],<payload>` shape
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Base64 payload could not be decoded
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no usable page tree
    #[error("Invalid page tree: {0}")]
    InvalidPageTree(String),

    /// Page number outside the document
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested 1-based page number
        page: usize,
        /// Pages in the document
        count: usize,
    },

    /// Remote source could not be fetched
    #[cfg(feature = "remote")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Store backend failure (budget exhaustion is not an error)
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_error() {
        let msg = format!("{}", Error::EmptyInput);
        assert!(msg.contains("No PDF sources"));
    }

    #[test]
    fn test_page_out_of_range_error() {
        let err = Error::PageOutOfRange { page: 7, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("Page 7"));
        assert!(msg.contains("3 pages"));
    }

    #[test]
    fn test_invalid_data_uri_error() {
        let err = Error::InvalidDataUri("data:nothing".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid data URI"));
        assert!(msg.contains("data:nothing"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).contains("missing.pdf"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
