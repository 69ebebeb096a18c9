//! Data model shared by every pipeline stage.
//!
//! A [`Document`] is what the extractor produces; a [`PageStream`] is the
//! page-delimited text that flows between the filter, the translator, the
//! field extractor and the inserter; [`ExtractedFields`] is what the field
//! extractor recovers from a stream.

mod document;
mod fields;
mod page;
mod stream;

pub use document::{Document, Metadata};
pub use fields::{CategoryCode, ExtractedFields, Quality, QualityScores};
pub use page::Page;
pub use stream::{PageStream, StreamPage};
