//! Page-text source abstraction.
//!
//! Provides a trait-based interface over whatever produces per-page text,
//! isolating the concrete PDF library (lopdf) from the extractor.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::PageStream;

/// Abstract interface for per-page text access.
pub trait PageSource {
    /// Number of pages in the source.
    fn page_count(&self) -> usize;

    /// Raw text of the page with the given 0-based index.
    fn page_text(&self, index: usize) -> Result<String>;

    /// Lines of the page with the given 0-based index.
    ///
    /// Defaults to splitting [`page_text`](Self::page_text) on line boundaries.
    fn page_lines(&self, index: usize) -> Result<Vec<String>> {
        Ok(self.page_text(index)?.lines().map(str::to_string).collect())
    }

    /// PDF version, when the source is a PDF.
    fn pdf_version(&self) -> Option<String> {
        None
    }
}

// ---------------------------------------------------------------------------
// LopdfSource: page text read through lopdf
// ---------------------------------------------------------------------------

/// Concrete [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    ///
    /// The file is read and closed before parsing starts, so the handle is
    /// released on every exit path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = {
            let mut reader = BufReader::new(File::open(path.as_ref())?);
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            data
        };
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            log::warn!("Document is encrypted; page text may be unreadable");
        }

        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_num = u32::try_from(index + 1)
            .map_err(|_| Error::PageOutOfRange(index, self.pages.len()))?;
        if !self.pages.contains_key(&page_num) {
            return Err(Error::PageOutOfRange(index, self.pages.len()));
        }
        self.doc
            .extract_text(&[page_num])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))
    }

    fn pdf_version(&self) -> Option<String> {
        Some(self.doc.version.to_string())
    }
}

// ---------------------------------------------------------------------------
// TextSource: pages that were already extracted elsewhere
// ---------------------------------------------------------------------------

/// A [`PageSource`] over pages already split into lines.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    pages: Vec<Vec<String>>,
}

impl TextSource {
    /// Create a source from one text per page.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|text| text.as_ref().lines().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Split text on form feeds, the page separator of `pdftotext`-style dumps.
    pub fn from_form_feeds(text: &str) -> Self {
        let mut pages: Vec<&str> = text.split('\u{000C}').collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        Self::from_pages(pages)
    }

    /// Take the page bodies of an existing page-delimited stream.
    ///
    /// Body lines are kept as they are, blank ones included.
    pub fn from_stream(stream: &PageStream) -> Self {
        Self {
            pages: stream
                .pages()
                .into_iter()
                .map(|page| page.lines.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }
}

impl PageSource for TextSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        self.page_lines(index).map(|lines| lines.join("\n"))
    }

    fn page_lines(&self, index: usize) -> Result<Vec<String>> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}
