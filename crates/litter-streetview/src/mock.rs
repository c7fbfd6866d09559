//! Offline image source for tests and dry runs.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use litter_core::{BlockId, Error, ImageJob, Result};

use crate::download::{image_file_name, DownloadReport};
use crate::ImageSource;

/// An [`ImageSource`] that writes placeholder files instead of calling Google.
#[derive(Debug)]
pub struct MockImageSource {
    images_per_job: usize,
    failing: HashSet<BlockId>,
    delay: Option<Duration>,
    calls: Mutex<Vec<BlockId>>,
}

impl MockImageSource {
    /// Create a mock writing `images_per_job` placeholder images per block.
    pub fn new(images_per_job: usize) -> Self {
        Self {
            images_per_job,
            failing: HashSet::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every job for `block_id`.
    pub fn with_failure(mut self, block_id: impl Into<BlockId>) -> Self {
        self.failing.insert(block_id.into());
        self
    }

    /// Sleep before each job, to exercise concurrency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Blocks extracted so far, in call order.
    pub fn calls(&self) -> Vec<BlockId> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of jobs run so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn extract(&self, job: &ImageJob, root: &Path) -> Result<DownloadReport> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(job.block_id.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&job.block_id) {
            return Err(Error::image_fetch(format!(
                "mock failure for block {}",
                job.block_id
            )));
        }

        let dir = root.join(job.folder_name());
        tokio::fs::create_dir_all(&dir).await?;

        let mut report = DownloadReport::default();
        for index in 0..self.images_per_job {
            let path = dir.join(image_file_name(index));
            tokio::fs::write(&path, b"mock").await?;
            report.files.push(path);
            report.downloaded += 1;
        }
        Ok(report)
    }
}
