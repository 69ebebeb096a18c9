//! Parallel processing of many sources.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;

use super::runner::{Pipeline, PipelineResult};

/// Outcome for one file of a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Input path
    pub path: PathBuf,

    /// Pipeline result or the error that stopped this file
    pub result: Result<PipelineResult>,
}

impl BatchItem {
    /// Whether this file was processed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run the pipeline (without translation) over every path in parallel.
///
/// Results come back in input order. One failing file does not stop the
/// others.
pub fn process_batch<P: AsRef<Path> + Sync>(pipeline: &Pipeline, paths: &[P]) -> Vec<BatchItem> {
    process_batch_with(pipeline, paths, |_| {})
}

/// Like [`process_batch`], calling `on_done` as each file finishes.
pub fn process_batch_with<P, F>(pipeline: &Pipeline, paths: &[P], on_done: F) -> Vec<BatchItem>
where
    P: AsRef<Path> + Sync,
    F: Fn(&BatchItem) + Sync,
{
    log::info!("Processing {} files", paths.len());

    let items: Vec<BatchItem> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = pipeline.run_file(path);
            if let Err(e) = &result {
                log::warn!("{}: {}", path.display(), e);
            }
            let item = BatchItem {
                path: path.to_path_buf(),
                result,
            };
            on_done(&item);
            item
        })
        .collect();

    let failed = items.iter().filter(|item| !item.is_ok()).count();
    log::info!("Batch finished: {} ok, {} failed", items.len() - failed, failed);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use crate::filter::{LineRule, RemovalRules};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("report-{}.txt", i));
            std::fs::write(&path, format!("--- Page 1 ---\nheader\nbody {}\n", i)).unwrap();
            paths.push(path);
        }
        paths.insert(2, dir.path().join("missing.txt"));

        let config = PipelineConfig::new()
            .with_rules(RemovalRules::new().with_rule(0, LineRule::indices([0])));
        let done = AtomicUsize::new(0);
        let items = process_batch_with(&Pipeline::new(config), &paths, |_| {
            done.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(items.len(), 5);
        assert_eq!(done.load(Ordering::SeqCst), 5);
        assert!(!items[2].is_ok());
        let first = items[0].result.as_ref().unwrap();
        assert_eq!(first.output.as_str(), "--- Page 1 ---\nbody 0\n");
        let last = items[4].result.as_ref().unwrap();
        assert_eq!(last.output.as_str(), "--- Page 1 ---\nbody 3\n");
        assert_eq!(items[4].path, paths[4]);
    }
}
