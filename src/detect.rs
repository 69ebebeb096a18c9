//! Source format detection.
//!
//! A pipeline source is either a PDF (handed to the page-text extractor) or a
//! text file that already holds a page-delimited stream.

use crate::error::{Error, Result};
use crate::model::PageStream;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// What kind of input a source holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A PDF document
    Pdf(PdfFormat),
    /// Text that already contains page markers
    PageStream,
    /// Anything else
    Unknown,
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Bytes inspected when sniffing a file.
const SNIFF_LEN: u64 = 4096;

/// Detect PDF format from the leading bytes of a source.
///
/// # Returns
/// * `Ok(PdfFormat)` if the data starts with a valid PDF header
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

/// Classify a source from its leading bytes.
pub fn detect_source_kind(data: &[u8]) -> SourceKind {
    if let Ok(format) = detect_format_from_bytes(data) {
        return SourceKind::Pdf(format);
    }

    let head = String::from_utf8_lossy(data);
    if head.lines().any(|line| PageStream::parse_marker(line).is_some()) {
        SourceKind::PageStream
    } else {
        SourceKind::Unknown
    }
}

/// Classify a file by reading only its first few kilobytes.
pub fn detect_source_kind_from_path<P: AsRef<Path>>(path: P) -> Result<SourceKind> {
    let mut head = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(detect_source_kind(&head))
}

/// Check if a version string is valid ("1.0" to "2.0" style).
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes represent a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
