//! Orchestration of the stages over one source or many.
//!
//! # Example
//!
//! ```no_run
//! use pagefix::pipeline::{Pipeline, PipelineConfig};
//!
//! fn main() -> pagefix::Result<()> {
//!     let config = PipelineConfig::from_file("report.json")?;
//!     let result = Pipeline::new(config).run_file("report.pdf")?;
//!     println!("{}", result.output);
//!     Ok(())
//! }
//! ```

mod batch;
mod options;
mod runner;

pub use batch::{process_batch, process_batch_with, BatchItem};
pub use options::{PipelineConfig, PipelineOptions};
pub use runner::{Pipeline, PipelineResult, PipelineStats};
