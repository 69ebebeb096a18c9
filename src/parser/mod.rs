//! Page text extraction.

mod extractor;
mod options;
mod source;

pub use extractor::PageExtractor;
pub use options::{ErrorMode, ParseOptions};
pub use source::{LopdfSource, PageSource, TextSource};
