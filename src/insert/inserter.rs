//! Single-pass replay of a stream with directives applied.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::PageStream;

use super::directives::{Directive, Directives};

/// Counters collected while applying directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertStats {
    /// Lines added by insertions
    pub lines_inserted: usize,

    /// Original lines dropped by deletions
    pub lines_deleted: usize,

    /// Directive addresses `(page_index, line)` that matched no line
    pub unmatched: Vec<(usize, usize)>,
}

/// Applies [`Directives`] to a page-delimited stream.
///
/// Insertions go before the addressed line; deletions drop it. Either way the
/// addressed line counts toward the page's line positions, so later addresses
/// on the same page refer to the unmodified input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTextInserter;

impl FixedTextInserter {
    /// Create a new inserter.
    pub fn new() -> Self {
        Self
    }

    /// Apply directives and return the new stream.
    pub fn apply(&self, stream: &PageStream, directives: &Directives) -> PageStream {
        self.apply_with_stats(stream, directives).0
    }

    /// Apply directives and report what changed.
    pub fn apply_with_stats(
        &self,
        stream: &PageStream,
        directives: &Directives,
    ) -> (PageStream, InsertStats) {
        let mut output = PageStream::new();
        let mut stats = InsertStats::default();
        let mut applied: BTreeSet<(usize, usize)> = BTreeSet::new();

        let mut current_page: Option<usize> = None;
        let mut line_in_page = 0usize;

        // split_inclusive keeps terminators, so untouched lines are copied byte for byte
        for raw in stream.as_str().split_inclusive('\n') {
            let line = raw.trim_end_matches(['\n', '\r']);

            if let Some(number) = PageStream::parse_marker(line) {
                current_page = Some(number.saturating_sub(1));
                line_in_page = 0;
                output.push_raw(raw);
                continue;
            }

            let Some(page_index) = current_page else {
                output.push_raw(raw);
                continue;
            };

            line_in_page += 1;
            let key = (page_index, line_in_page);
            match directives.get(page_index, line_in_page) {
                Some(Directive::Delete) => {
                    log::debug!("Deleting page index {} line {}", page_index, line_in_page);
                    stats.lines_deleted += 1;
                    applied.insert(key);
                }
                Some(directive @ Directive::Insert(text)) => {
                    log::debug!("Inserting before page index {} line {}", page_index, line_in_page);
                    output.push_raw(text);
                    if !text.ends_with('\n') {
                        output.push_raw("\n");
                    }
                    output.push_raw(raw);
                    stats.lines_inserted += directive.inserted_lines();
                    applied.insert(key);
                }
                None => output.push_raw(raw),
            }
        }

        for (key, _) in directives.iter() {
            if !applied.contains(key) {
                log::warn!(
                    "Directive for page index {} line {} matched no line",
                    key.0,
                    key.1
                );
                stats.unmatched.push(*key);
            }
        }

        log::info!(
            "Applied directives: {} lines inserted, {} deleted, {} unmatched",
            stats.lines_inserted,
            stats.lines_deleted,
            stats.unmatched.len()
        );
        (output, stats)
    }
}
