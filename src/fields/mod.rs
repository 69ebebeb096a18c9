//! Best-effort structured field extraction from report text.

mod extractor;
mod heuristics;
mod options;

pub use extractor::FieldExtractor;
pub use heuristics::{
    find_category_code, find_date, find_name, find_scores_line, parse_scores_line,
    SCORE_SEPARATOR,
};
pub use options::FieldOptions;
