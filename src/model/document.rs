//! Document-level types.

use super::{Page, PageStream};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An extracted document: an ordered, contiguous sequence of pages.
///
/// Page indices are assigned on insertion, so `pages()[i].index == i` always
/// holds. The page count is fixed once extraction finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from per-page text, splitting each page on line boundaries.
    pub fn from_page_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::new();
        for text in texts {
            doc.push_page_text(text.as_ref());
        }
        doc
    }

    /// Append a page holding the given lines. Returns its 0-based index.
    pub fn push_page(&mut self, lines: Vec<String>) -> usize {
        let index = self.pages.len();
        self.pages.push(Page::with_lines(index, lines));
        self.metadata.page_count = self.pages.len();
        index
    }

    /// Append a page from its raw extracted text.
    pub fn push_page_text(&mut self, text: &str) -> usize {
        self.push_page(text.lines().map(str::to_string).collect())
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by 0-based index.
    pub fn get_page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of lines across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Page::line_count).sum()
    }

    /// Render every page unfiltered as a page-delimited stream.
    pub fn raw_stream(&self) -> PageStream {
        let mut stream = PageStream::new();
        for page in &self.pages {
            stream.push_page(page.number(), &page.lines);
        }
        stream
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Where the document came from (file name or caller label)
    pub source: Option<String>,

    /// PDF version (e.g., "1.7"), when the source was a PDF
    pub pdf_version: Option<String>,

    /// Total number of pages
    pub page_count: usize,

    /// When extraction finished
    pub extracted_at: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Create metadata labelled with a source name.
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_pages_are_contiguous() {
        let doc = Document::from_page_texts(["a\nb", "", "c\r\nd\n"]);
        assert_eq!(doc.page_count(), 3);
        for (i, page) in doc.pages().iter().enumerate() {
            assert_eq!(page.index, i);
        }
        assert_eq!(doc.get_page(2).unwrap().lines, vec!["c", "d"]);
        assert!(doc.get_page(1).unwrap().is_empty());
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.metadata.page_count, 3);
    }

    #[test]
    fn test_raw_stream() {
        let doc = Document::from_page_texts(["first\nsecond", "third"]);
        assert_eq!(
            doc.raw_stream().as_str(),
            "--- Page 1 ---\nfirst\nsecond\n--- Page 2 ---\nthird\n"
        );
    }

    #[test]
    fn test_duplicate_lines_kept() {
        let doc = Document::from_page_texts(["x\nx\nx"]);
        assert_eq!(doc.get_page(0).unwrap().line_count(), 3);
    }
}
