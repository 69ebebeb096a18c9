//! Error types for the pagefix pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for pagefix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while running the pipeline.
///
/// Field lookups never produce an error; a missing field is an absent value.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source is not recognized as a PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting the text of a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page index is outside the document.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Structurally malformed removal rules or insertion directives.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The translator failed; downstream stages must not run.
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Text could not be decoded to UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means the source could not be opened or parsed.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::TextExtract(_)
                | Error::PageOutOfRange(..)
        )
    }

    /// Shorthand for a [`Error::Config`] error.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
