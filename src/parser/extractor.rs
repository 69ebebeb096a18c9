//! Page extractor: turns a page-text source into a [`Document`].

use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::model::{Document, Metadata};

use super::options::{ErrorMode, ParseOptions};
use super::source::{LopdfSource, PageSource};

/// Extracts ordered pages of raw lines from a [`PageSource`].
///
/// No content inspection happens here: each page's text is split on line
/// boundaries and stored as-is.
pub struct PageExtractor<S: PageSource> {
    source: S,
    options: ParseOptions,
}

impl PageExtractor<LopdfSource> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let options = match options.source_label {
            Some(_) => options,
            None => options.with_source_label(path.display().to_string()),
        };
        Ok(Self::with_options(LopdfSource::load_file(path)?, options))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Ok(Self::with_options(LopdfSource::load_bytes(data)?, options))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(LopdfSource::load_reader(reader)?))
    }
}

impl<S: PageSource> PageExtractor<S> {
    /// Wrap a source with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Wrap a source with custom options.
    pub fn with_options(source: S, options: ParseOptions) -> Self {
        Self { source, options }
    }

    /// Get the number of pages in the source.
    pub fn page_count(&self) -> usize {
        self.source.page_count()
    }

    /// Extract every page, in source order.
    pub fn extract(&self) -> Result<Document> {
        let mut document = Document::new();
        document.metadata = Metadata {
            source: self.options.source_label.clone(),
            pdf_version: self.source.pdf_version(),
            ..Default::default()
        };

        let total = self.source.page_count();
        log::info!("Extracting {} pages", total);

        for index in 0..total {
            match self.source.page_lines(index) {
                Ok(lines) => {
                    log::debug!("Page {}: {} lines", index + 1, lines.len());
                    document.push_page(lines);
                }
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    // Keep the page so later page indices stay aligned.
                    log::warn!("Failed to extract text from page {}: {}", index + 1, e);
                    document.push_page(Vec::new());
                }
            }
        }

        document.metadata.extracted_at = Some(chrono::Utc::now());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::TextSource;

    struct FlakySource;

    impl PageSource for FlakySource {
        fn page_count(&self) -> usize {
            3
        }

        fn page_text(&self, index: usize) -> Result<String> {
            if index == 1 {
                Err(Error::TextExtract("Page 2: bad font".into()))
            } else {
                Ok(format!("page {}\nsecond line", index + 1))
            }
        }
    }

    #[test]
    fn test_extract_text_source() {
        let extractor = PageExtractor::new(TextSource::from_pages(["a\nb\nc", "", "d"]));
        let doc = extractor.extract().unwrap();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.get_page(0).unwrap().lines, vec!["a", "b", "c"]);
        assert!(doc.get_page(1).unwrap().is_empty());
        assert!(doc.metadata.extracted_at.is_some());
    }

    #[test]
    fn test_strict_mode_aborts() {
        let extractor = PageExtractor::new(FlakySource);
        assert!(matches!(extractor.extract(), Err(Error::TextExtract(_))));
    }

    #[test]
    fn test_lenient_mode_keeps_page_alignment() {
        let extractor = PageExtractor::with_options(FlakySource, ParseOptions::new().lenient());
        let doc = extractor.extract().unwrap();
        assert_eq!(doc.page_count(), 3);
        assert!(doc.get_page(1).unwrap().is_empty());
        assert_eq!(doc.get_page(2).unwrap().lines[0], "page 3");
    }

    #[test]
    fn test_open_missing_file() {
        let result = PageExtractor::open("/no/such/report.pdf");
        assert!(result.is_err());
        assert!(result.err().unwrap().is_extraction());
    }

    #[test]
    fn test_from_bytes_invalid() {
        assert!(PageExtractor::from_bytes(b"%PDF").is_err());
        assert!(PageExtractor::from_bytes(b"hello world").is_err());
    }

    #[test]
    fn test_from_reader_rejects_non_pdf() {
        let reader = std::io::Cursor::new(b"not a pdf".to_vec());
        assert!(matches!(PageExtractor::from_reader(reader), Err(Error::UnknownFormat)));
    }
}
