//! Translation of a page-delimited stream.
//!
//! Translation is the one external, asynchronous step of the pipeline. A
//! translator receives the whole filtered stream and must hand back a stream
//! with the same page markers; the field extractor and the inserter both
//! address content by page.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiTranslator, DEFAULT_MODEL};

use crate::error::Result;

/// Translates stream text.
#[allow(async_fn_in_trait)]
pub trait Translator {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Translate the text, keeping every page marker line intact.
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

impl Translator for NoopTranslator {
    fn name(&self) -> &str {
        "noop"
    }

    async fn translate(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// System prompt asking for a translation that keeps page structure.
pub fn system_prompt(target_language: &str) -> String {
    format!(
        "You are a professional translator. Translate the following text into formal, \
         professional {target_language}, keeping the original meaning and tone.\n\
         Follow these rules strictly:\n\
         1. Keep the page count and page order exactly as in the input.\n\
         2. Copy every page separator line of the form --- Page N --- unchanged, \
         with the same number, on its own line.\n\
         3. Keep all content of a page on that same page; nothing may move to another page.\n\
         4. Keep lines that hold table rows separated by | as rows, translating only the words.\n\
         5. Output only the translated text."
    )
}
