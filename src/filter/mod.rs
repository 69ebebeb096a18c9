//! Declarative per-page line removal.

mod line_filter;
mod rules;

pub use line_filter::{FilterStats, LineFilter};
pub use rules::{LineRule, RemovalRules, SKIP_ALL_KEYWORD};

pub(crate) use rules::parse_index_key;
