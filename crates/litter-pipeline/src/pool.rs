//! Worker pool for image extraction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use litter_core::{BlockId, Error, JobOutcome, Result};
use litter_streetview::ImageSource;

use crate::queue::JobQueue;

/// A fixed number of workers draining a shared [`JobQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool; `0` means two workers per available CPU.
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            default_workers()
        } else {
            workers
        };
        Self { workers }
    }

    /// Configured number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Workers actually started for `jobs` queued jobs.
    pub fn size_for(&self, jobs: usize) -> usize {
        self.workers.min(jobs).max(1)
    }

    /// Runs every job in `queue` and returns each block's outcome.
    ///
    /// A failing job is recorded and its worker moves on to the next one.
    /// Outcomes are in completion order.
    pub async fn run(
        &self,
        queue: JobQueue,
        source: Arc<dyn ImageSource>,
        root: &Path,
    ) -> Result<Vec<(BlockId, JobOutcome)>> {
        let size = self.size_for(queue.len().await);
        tracing::info!(workers = size, "Starting image workers");

        let mut handles = Vec::with_capacity(size);
        for worker in 0..size {
            let queue = queue.clone();
            let source = Arc::clone(&source);
            let root = root.to_path_buf();
            handles.push(tokio::spawn(async move {
                work(worker, queue, source, root).await
            }));
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            let finished = handle
                .await
                .map_err(|e| Error::image_fetch_with_source("image worker panicked", e))?;
            outcomes.extend(finished);
        }
        Ok(outcomes)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(0)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(2)
}

async fn work(
    worker: usize,
    queue: JobQueue,
    source: Arc<dyn ImageSource>,
    root: PathBuf,
) -> Vec<(BlockId, JobOutcome)> {
    let mut outcomes = Vec::new();
    while let Some(job) = queue.pop().await {
        tracing::info!(worker, block_id = %job.block_id, "Extracting images");
        let outcome = match source.extract(&job, &root).await {
            Ok(report) => {
                tracing::debug!(
                    worker,
                    block_id = %job.block_id,
                    downloaded = report.downloaded,
                    skipped = report.skipped,
                    "Block done"
                );
                JobOutcome::Downloaded {
                    images: report.downloaded,
                    skipped: report.skipped,
                }
            }
            Err(err) => {
                tracing::warn!(worker, block_id = %job.block_id, error = %err, "Image extraction failed");
                JobOutcome::from(&err)
            }
        };
        outcomes.push((job.block_id, outcome));
    }
    tracing::debug!(worker, "Worker finished");
    outcomes
}
