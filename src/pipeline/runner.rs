//! End-to-end run over one source.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::detect::{detect_source_kind_from_path, SourceKind};
use crate::encoding::read_text_file;
use crate::error::{Error, Result};
use crate::fields::FieldExtractor;
use crate::filter::{FilterStats, LineFilter};
use crate::insert::{FixedTextInserter, InsertStats};
use crate::model::{Document, ExtractedFields, Metadata, PageStream};
use crate::parser::{PageExtractor, PageSource, ParseOptions, TextSource};
use crate::translate::Translator;

use super::options::{PipelineConfig, PipelineOptions};

/// Counters from every stage of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Pages in the extracted document
    pub page_count: usize,

    /// Lines in the extracted document
    pub raw_line_count: usize,

    /// Filter counters
    pub filter: FilterStats,

    /// Inserter counters
    pub insert: InsertStats,

    /// Whether a translator ran
    pub translated: bool,

    /// Wall time of the run in milliseconds
    pub elapsed_ms: u128,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Source document metadata
    pub metadata: Metadata,

    /// Unfiltered stream (only with `keep_intermediate`)
    pub raw: Option<PageStream>,

    /// Filtered stream before translation (only with `keep_intermediate`)
    pub filtered: Option<PageStream>,

    /// Translated stream, when a translator ran
    pub translated: Option<PageStream>,

    /// Fields recovered from the (translated) stream
    pub fields: ExtractedFields,

    /// The stream handed to the renderer
    pub output: PageStream,

    /// Stage counters
    pub stats: PipelineStats,
}

/// Runs extraction, filtering, optional translation, field extraction and
/// fixed-text insertion in that order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline for a configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_options(config, PipelineOptions::default())
    }

    /// Create a pipeline with custom options.
    pub fn with_options(config: PipelineConfig, options: PipelineOptions) -> Self {
        Self { config, options }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The options in use.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Extract a document from any page source.
    pub fn extract<S: PageSource>(&self, source: S) -> Result<Document> {
        PageExtractor::with_options(source, self.options.parse.clone()).extract()
    }

    /// Run every stage except translation.
    pub fn run_document(&self, document: &Document) -> PipelineResult {
        let start = Instant::now();
        let (filtered, filter_stats) = LineFilter::new().filter_with_stats(document, &self.config.rules);
        let mut result = self.finish(document, filtered, None, filter_stats);
        result.stats.elapsed_ms = start.elapsed().as_millis();
        result
    }

    /// Run every stage, translating the filtered stream before field
    /// extraction.
    ///
    /// A translation failure stops the run with [`Error::Translation`]; fields
    /// are not extracted and no directive is applied.
    pub async fn run_document_translated<T: Translator>(
        &self,
        document: &Document,
        translator: &T,
    ) -> Result<PipelineResult> {
        let start = Instant::now();
        let (filtered, filter_stats) = LineFilter::new().filter_with_stats(document, &self.config.rules);

        log::info!("Translating {} pages with {}", filtered.page_count(), translator.name());
        let translated = match translator.translate(filtered.as_str()).await {
            Ok(text) => PageStream::from_text(text),
            Err(Error::Translation(msg)) => return Err(Error::Translation(msg)),
            Err(e) => return Err(Error::Translation(e.to_string())),
        };
        self.check_pages(&filtered, &translated)?;

        let mut result = self.finish(document, filtered, Some(translated), filter_stats);
        result.stats.elapsed_ms = start.elapsed().as_millis();
        Ok(result)
    }

    /// Extract and process a source without translation.
    pub fn run_untranslated<S: PageSource>(&self, source: S) -> Result<PipelineResult> {
        let document = self.extract(source)?;
        Ok(self.run_document(&document))
    }

    /// Extract, translate and process a source.
    pub async fn run<S: PageSource, T: Translator>(
        &self,
        source: S,
        translator: &T,
    ) -> Result<PipelineResult> {
        let document = self.extract(source)?;
        self.run_document_translated(&document, translator).await
    }

    /// Process a file without translation.
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<PipelineResult> {
        let document = self.load_document(path)?;
        Ok(self.run_document(&document))
    }

    /// Load a document from a PDF or from a text file.
    ///
    /// Text holding page markers is split at the markers; other text is split
    /// at form feeds, so a plain dump without them is a single page.
    pub fn load_document<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        let options = labeled(&self.options.parse, path);

        match detect_source_kind_from_path(path)? {
            SourceKind::Pdf(format) => {
                log::debug!("{}: {}", path.display(), format);
                PageExtractor::open_with_options(path, options)?.extract()
            }
            SourceKind::PageStream | SourceKind::Unknown => {
                let text = read_text_file(path)?;
                let source = text_source(&text);
                PageExtractor::with_options(source, options).extract()
            }
        }
    }

    fn check_pages(&self, filtered: &PageStream, translated: &PageStream) -> Result<()> {
        let before = filtered.page_count();
        let after = translated.page_count();
        if before == after {
            return Ok(());
        }
        if self.options.strict_pages {
            return Err(Error::Translation(format!(
                "page count changed from {} to {}",
                before, after
            )));
        }
        log::warn!(
            "Translation changed the page count from {} to {}; directives may land on other pages",
            before,
            after
        );
        Ok(())
    }

    fn finish(
        &self,
        document: &Document,
        filtered: PageStream,
        translated: Option<PageStream>,
        filter_stats: FilterStats,
    ) -> PipelineResult {
        let working = translated.as_ref().unwrap_or(&filtered);

        let fields = FieldExtractor::with_options(self.config.fields.clone()).extract(working);
        let directives = self.config.directives.render(&fields);
        let (output, insert_stats) = FixedTextInserter::new().apply_with_stats(working, &directives);

        let stats = PipelineStats {
            page_count: document.page_count(),
            raw_line_count: document.line_count(),
            filter: filter_stats,
            insert: insert_stats,
            translated: translated.is_some(),
            elapsed_ms: 0,
        };

        let keep = self.options.keep_intermediate;
        PipelineResult {
            metadata: document.metadata.clone(),
            raw: keep.then(|| document.raw_stream()),
            filtered: keep.then_some(filtered),
            translated,
            fields,
            output,
            stats,
        }
    }
}

fn text_source(text: &str) -> TextSource {
    let stream = PageStream::from_text(text);
    if stream.page_count() > 0 {
        TextSource::from_stream(&stream)
    } else {
        TextSource::from_form_feeds(text)
    }
}

/// Extraction options labeled with the path unless a label is already set.
fn labeled(options: &ParseOptions, path: &Path) -> ParseOptions {
    match options.source_label {
        Some(_) => options.clone(),
        None => options.clone().with_source_label(path.display().to_string()),
    }
}
