//! The page-delimited text stream.
//!
//! A stream is a sequence of page bodies, each preceded by a marker line of the
//! form `--- Page <N> ---` where `N` is the 1-based page number:
//!
//! ```text
//! --- Page 1 ---
//! first line of page one
//! --- Page 2 ---
//! --- Page 3 ---
//! only line of page three
//! ```
//!
//! This is the interchange format between the filter, the inserter and the
//! downstream renderer, so the marker punctuation must not change.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---\s*(?i:page)\s+(\d+)\s*---$").unwrap());

/// One page section of a parsed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPage<'a> {
    /// Page number from the marker (1-based)
    pub number: usize,
    /// Body lines, without line terminators
    pub lines: Vec<&'a str>,
}

/// Page-delimited text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageStream {
    text: String,
}

impl PageStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing text (e.g. a translated stream) without modification.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Format a marker line for a 1-based page number (no terminator).
    pub fn marker(number: usize) -> String {
        format!("--- Page {} ---", number)
    }

    /// Parse a marker line and return its page number.
    ///
    /// Surrounding whitespace and any letter case of `page` are tolerated;
    /// translated streams come back with either.
    pub fn parse_marker(line: &str) -> Option<usize> {
        MARKER_RE
            .captures(line.trim())
            .and_then(|caps| caps[1].parse().ok())
    }

    /// Append a page: its marker followed by each body line.
    pub fn push_page<I, S>(&mut self, number: usize, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.text.push_str(&Self::marker(number));
        self.text.push('\n');
        for line in lines {
            self.push_line(line.as_ref());
        }
    }

    /// Append a single `\n`-terminated line.
    pub fn push_line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    /// Append raw text verbatim (terminators included).
    pub(crate) fn push_raw(&mut self, raw: &str) {
        self.text.push_str(raw);
    }

    /// The stream text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the stream and return its text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Check if the stream holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Iterate over all lines, markers included.
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Iterate over body lines only, skipping markers.
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .lines()
            .filter(|line| Self::parse_marker(line).is_none())
    }

    /// Split the stream into page sections.
    ///
    /// Lines before the first marker belong to no page and are not returned.
    pub fn pages(&self) -> Vec<StreamPage<'_>> {
        let mut pages: Vec<StreamPage<'_>> = Vec::new();
        for line in self.text.lines() {
            if let Some(number) = Self::parse_marker(line) {
                pages.push(StreamPage {
                    number,
                    lines: Vec::new(),
                });
            } else if let Some(current) = pages.last_mut() {
                current.lines.push(line);
            }
        }
        pages
    }

    /// Body lines of the page with the given 1-based number.
    pub fn page(&self, number: usize) -> Option<StreamPage<'_>> {
        self.pages().into_iter().find(|page| page.number == number)
    }

    /// Number of page markers in the stream.
    pub fn page_count(&self) -> usize {
        self.text
            .lines()
            .filter(|line| Self::parse_marker(line).is_some())
            .count()
    }
}

impl fmt::Display for PageStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<String> for PageStream {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<&str> for PageStream {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl AsRef<str> for PageStream {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_roundtrip() {
        assert_eq!(PageStream::marker(12), "--- Page 12 ---");
        assert_eq!(PageStream::parse_marker("--- Page 12 ---"), Some(12));
        assert_eq!(PageStream::parse_marker("  --- page 3 ---\r"), Some(3));
        assert_eq!(PageStream::parse_marker("--- PAGE 4 ---"), Some(4));
        assert_eq!(PageStream::parse_marker("--- Page x ---"), None);
        assert_eq!(PageStream::parse_marker("Page 3"), None);
        assert_eq!(PageStream::parse_marker("--- Page 3 --- extra"), None);
    }

    #[test]
    fn test_push_page() {
        let mut stream = PageStream::new();
        stream.push_page(1, ["a", "b"]);
        stream.push_page(2, Vec::<String>::new());
        assert_eq!(stream.as_str(), "--- Page 1 ---\na\nb\n--- Page 2 ---\n");
        assert_eq!(stream.page_count(), 2);
    }

    #[test]
    fn test_pages_split() {
        let stream = PageStream::from_text("preamble\n--- Page 1 ---\nx\n\n--- Page 2 ---\ny\n");
        let pages = stream.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].lines, vec!["x", ""]);
        assert_eq!(pages[1].lines, vec!["y"]);
        assert_eq!(stream.page(2).unwrap().lines, vec!["y"]);
        assert!(stream.page(3).is_none());
    }

    #[test]
    fn test_body_lines_skip_markers() {
        let stream = PageStream::from_text("--- Page 1 ---\nx\n--- Page 2 ---\ny\n");
        let body: Vec<_> = stream.body_lines().collect();
        assert_eq!(body, vec!["x", "y"]);
    }
}
