//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single extracted page: raw text lines in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,

    /// Raw lines; duplicates allowed, order significant
    pub lines: Vec<String>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            lines: Vec::new(),
        }
    }

    /// Create a page holding the given lines.
    pub fn with_lines(index: usize, lines: Vec<String>) -> Self {
        Self { index, lines }
    }

    /// Page number as shown in stream markers (1-based).
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Get a line by its 0-based extraction position.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines on the page.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.lines.join("\n")
    }
}
