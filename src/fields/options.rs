//! Field extraction options.

use serde::{Deserialize, Serialize};

/// Where the positional field lookups look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// 1-based position of the name among non-empty body lines
    pub name_line: usize,

    /// 1-based page number holding the score row
    pub scores_page: usize,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            name_line: 2,
            scores_page: 3,
        }
    }
}

impl FieldOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name line position.
    pub fn with_name_line(mut self, position: usize) -> Self {
        self.name_line = position;
        self
    }

    /// Set the score page number.
    pub fn with_scores_page(mut self, page_number: usize) -> Self {
        self.scores_page = page_number;
        self
    }
}
