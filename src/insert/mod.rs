//! Fixed text insertion and deletion at page/line coordinates.

mod directives;
mod inserter;

pub use directives::{Directive, Directives, DELETE_SENTINEL};
pub use inserter::{FixedTextInserter, InsertStats};
