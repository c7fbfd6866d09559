//! Shared image job queue.

use std::sync::Arc;

use litter_core::ImageJob;
use tokio::sync::Mutex;

use crate::geocode::GeocodedBlock;

/// A LIFO queue of image jobs shared by all workers.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    jobs: Arc<Mutex<Vec<ImageJob>>>,
}

impl JobQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue holding `jobs`; the last job is popped first.
    pub fn from_jobs(jobs: Vec<ImageJob>) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(jobs)),
        }
    }

    /// One job per geocoded block, in block order. Blocks without
    /// coordinates are left out.
    pub fn from_blocks(blocks: &[GeocodedBlock]) -> Self {
        let jobs = blocks
            .iter()
            .filter_map(|geocoded| {
                geocoded
                    .coordinates()
                    .map(|c| ImageJob::new(geocoded.block.block_id.clone(), c))
            })
            .collect();
        Self::from_jobs(jobs)
    }

    /// Adds a job.
    pub async fn push(&self, job: ImageJob) {
        self.jobs.lock().await.push(job);
    }

    /// Takes the most recently queued job.
    pub async fn pop(&self) -> Option<ImageJob> {
        self.jobs.lock().await.pop()
    }

    /// Number of jobs waiting.
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Returns `true` if no jobs are waiting.
    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}
