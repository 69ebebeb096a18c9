//! # pagefix
//!
//! Page-addressed text pipeline for extracted report documents.
//!
//! The library turns the per-page text of a document into a cleaned,
//! annotated, page-delimited stream ready to be rendered again:
//!
//! 1. **Extract** ordered pages of raw lines from a PDF or text dump
//! 2. **Filter** lines page by page with declarative removal rules
//! 3. **Translate** the stream (optional, external)
//! 4. **Recover fields**: category code, name, date and quality scores
//! 5. **Insert** fixed text or delete lines at page/line coordinates
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagefix::{process_file, PipelineConfig};
//!
//! fn main() -> pagefix::Result<()> {
//!     let config = PipelineConfig::from_json(
//!         r#"{"rules": {"0": "ALL"}, "directives": {"2": {"1": "Type: {category}"}}}"#,
//!     )?;
//!     let result = process_file("report.pdf", &config)?;
//!     println!("{}", result.output);
//!     Ok(())
//! }
//! ```
//!
//! ## Page-delimited format
//!
//! ```text
//! --- Page 1 ---
//! body line
//! --- Page 2 ---
//! ```
//!
//! Removal rules and directives address pages by 0-based index, so page
//! index 2 is the body under `--- Page 3 ---`.

pub mod detect;
pub mod encoding;
pub mod error;
pub mod fields;
pub mod filter;
pub mod insert;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod translate;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_source_kind_from_path, PdfFormat, SourceKind};
pub use error::{Error, Result};
pub use fields::{FieldExtractor, FieldOptions};
pub use filter::{FilterStats, LineFilter, LineRule, RemovalRules};
pub use insert::{Directive, Directives, FixedTextInserter, InsertStats};
pub use model::{
    CategoryCode, Document, ExtractedFields, Metadata, Page, PageStream, Quality, QualityScores,
};
pub use parser::{ErrorMode, LopdfSource, PageExtractor, PageSource, ParseOptions, TextSource};
pub use pipeline::{
    process_batch, Pipeline, PipelineConfig, PipelineOptions, PipelineResult, PipelineStats,
};
pub use translate::{NoopTranslator, Translator};

#[cfg(feature = "openai")]
pub use translate::OpenAiTranslator;

use std::path::Path;

/// Extract the pages of a PDF file.
///
/// # Example
///
/// ```no_run
/// let doc = pagefix::extract_file("report.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PageExtractor::open(path)?.extract()
}

/// Extract the pages of a PDF held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<Document> {
    PageExtractor::from_bytes(data)?.extract()
}

/// Filter a document into a page-delimited stream.
///
/// # Example
///
/// ```
/// use pagefix::{filter_document, Document, LineRule, RemovalRules};
///
/// let doc = Document::from_page_texts(["cover", "a\nb"]);
/// let rules = RemovalRules::new().with_rule(0, LineRule::SkipAll);
/// let stream = filter_document(&doc, &rules);
/// assert_eq!(stream.as_str(), "--- Page 1 ---\n--- Page 2 ---\na\nb\n");
/// ```
pub fn filter_document(document: &Document, rules: &RemovalRules) -> PageStream {
    LineFilter::new().filter(document, rules)
}

/// Recover fields from a stream with default positions.
pub fn extract_fields(stream: &PageStream) -> ExtractedFields {
    FieldExtractor::new().extract(stream)
}

/// Apply directives to a stream.
///
/// # Example
///
/// ```
/// use pagefix::{apply_directives, Directives, PageStream};
///
/// let stream = PageStream::from_text("--- Page 1 ---\nbody\n");
/// let directives = Directives::new().with_insert(0, 1, "HEADER");
/// let output = apply_directives(&stream, &directives);
/// assert_eq!(output.as_str(), "--- Page 1 ---\nHEADER\nbody\n");
/// ```
pub fn apply_directives(stream: &PageStream, directives: &Directives) -> PageStream {
    FixedTextInserter::new().apply(stream, directives)
}

/// Run the whole pipeline (without translation) over a PDF or text file.
pub fn process_file<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<PipelineResult> {
    Pipeline::new(config.clone()).run_file(path)
}
