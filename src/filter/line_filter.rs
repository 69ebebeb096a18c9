//! Applies removal rules page by page.

use serde::{Deserialize, Serialize};

use crate::model::{Document, Page, PageStream};

use super::rules::{LineRule, RemovalRules};

/// Counters collected while filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Pages written to the output
    pub page_count: usize,

    /// Pages emptied by a skip-all rule
    pub pages_skipped: usize,

    /// Lines removed across all pages
    pub lines_removed: usize,

    /// Lines kept across all pages
    pub lines_kept: usize,

    /// Rule page indices that do not exist in the document
    pub ignored_rule_pages: Vec<usize>,

    /// Kept lines that parse as page markers
    pub marker_like_lines: usize,
}

/// Per-page line filter.
///
/// Every page of the document produces exactly one marker in the output, in
/// document order, whatever its rule says.
///
/// Page text is written as-is. A kept line that reads like a marker
/// (`--- Page 9 ---`) starts a new page for every later stage, so such lines
/// are logged and counted but not rewritten. Remove them with a rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFilter;

impl LineFilter {
    /// Create a new filter.
    pub fn new() -> Self {
        Self
    }

    /// Filter a document into a page-delimited stream.
    pub fn filter(&self, document: &Document, rules: &RemovalRules) -> PageStream {
        self.filter_with_stats(document, rules).0
    }

    /// Filter a document and report what was removed.
    pub fn filter_with_stats(
        &self,
        document: &Document,
        rules: &RemovalRules,
    ) -> (PageStream, FilterStats) {
        let mut stream = PageStream::new();
        let mut stats = FilterStats {
            page_count: document.page_count(),
            ..Default::default()
        };

        for (page_index, _) in rules.iter() {
            if page_index >= document.page_count() {
                log::debug!(
                    "Ignoring removal rule for page index {} (document has {} pages)",
                    page_index,
                    document.page_count()
                );
                stats.ignored_rule_pages.push(page_index);
            }
        }

        for page in document.pages() {
            let kept = match rules.get(page.index) {
                Some(rule) => apply_rule(page, rule),
                None => page.lines.iter().map(String::as_str).collect(),
            };

            if matches!(rules.get(page.index), Some(LineRule::SkipAll)) {
                stats.pages_skipped += 1;
            }
            let removed = page.line_count() - kept.len();
            if removed > 0 {
                log::debug!("Page {}: removed {} lines", page.number(), removed);
            }
            stats.lines_removed += removed;
            stats.lines_kept += kept.len();

            for line in kept.iter().filter(|line| PageStream::parse_marker(line).is_some()) {
                log::warn!(
                    "Page {}: line {:?} reads as a page marker and will split the page downstream",
                    page.number(),
                    line
                );
                stats.marker_like_lines += 1;
            }

            stream.push_page(page.number(), kept);
        }

        log::info!(
            "Filtered {} pages: {} lines kept, {} removed",
            stats.page_count,
            stats.lines_kept,
            stats.lines_removed
        );
        (stream, stats)
    }
}

fn apply_rule<'a>(page: &'a Page, rule: &LineRule) -> Vec<&'a str> {
    page.lines
        .iter()
        .enumerate()
        .filter(|(index, line)| !rule.removes(*index, line))
        .map(|(_, line)| line.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::from_page_texts(["a\nb\nc", "keep\nConfidential note\nkeep too", "x\ny"])
    }

    #[test]
    fn test_no_rules_keeps_everything() {
        let stream = LineFilter::new().filter(&sample(), &RemovalRules::new());
        assert_eq!(
            stream.as_str(),
            "--- Page 1 ---\na\nb\nc\n--- Page 2 ---\nkeep\nConfidential note\nkeep too\n--- Page 3 ---\nx\ny\n"
        );
    }

    #[test]
    fn test_mixed_rules() {
        let rules = RemovalRules::new()
            .with_rule(0, LineRule::SkipAll)
            .with_rule(1, LineRule::containing(["Confidential"]))
            .with_rule(2, LineRule::indices([0]));
        let (stream, stats) = LineFilter::new().filter_with_stats(&sample(), &rules);
        assert_eq!(
            stream.as_str(),
            "--- Page 1 ---\n--- Page 2 ---\nkeep\nkeep too\n--- Page 3 ---\ny\n"
        );
        assert_eq!(stats.pages_skipped, 1);
        assert_eq!(stats.lines_removed, 5);
        assert_eq!(stats.lines_kept, 3);
    }

    #[test]
    fn test_out_of_range_rule_ignored() {
        let rules = RemovalRules::new().with_rule(9, LineRule::SkipAll);
        let (stream, stats) = LineFilter::new().filter_with_stats(&sample(), &rules);
        assert_eq!(stream.page_count(), 3);
        assert_eq!(stats.ignored_rule_pages, vec![9]);
        assert_eq!(stats.lines_removed, 0);
    }

    #[test]
    fn test_marker_like_line_counted() {
        let document = Document::from_page_texts(["intro\n--- page 9 ---\ntail", "plain"]);
        let (stream, stats) = LineFilter::new().filter_with_stats(&document, &RemovalRules::new());
        assert_eq!(stats.marker_like_lines, 1);
        assert_eq!(stream.page_count(), 3);

        let rules = RemovalRules::new().with_rule(0, LineRule::indices([1]));
        let (stream, stats) = LineFilter::new().filter_with_stats(&document, &rules);
        assert_eq!(stats.marker_like_lines, 0);
        assert_eq!(stream.page_count(), 2);
    }

    #[test]
    fn test_empty_document() {
        let stream = LineFilter::new().filter(&Document::new(), &RemovalRules::new());
        assert!(stream.is_empty());
    }
}
