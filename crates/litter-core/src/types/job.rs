//! Image extraction jobs and their outcomes.

use serde::{Deserialize, Serialize};

use crate::types::{BlockId, Coordinates};

/// One unit of image work: the sweep of images around one geocoded block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageJob {
    /// Block the images belong to
    pub block_id: BlockId,
    /// Location to photograph
    pub coordinates: Coordinates,
}

impl ImageJob {
    /// Creates a new image job.
    pub fn new(block_id: BlockId, coordinates: Coordinates) -> Self {
        Self {
            block_id,
            coordinates,
        }
    }

    /// Name of the folder the job's images are written to.
    pub fn folder_name(&self) -> &str {
        self.block_id.as_str()
    }
}

/// The result of executing an image job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum JobOutcome {
    /// The job ran to completion.
    Downloaded {
        /// Number of images written
        images: usize,
        /// Number of headings with no imagery available
        skipped: usize,
    },

    /// The job failed.
    Failed {
        /// Error description
        error: String,
        /// Whether the failure was transient
        retryable: bool,
    },
}

impl JobOutcome {
    /// Returns `true` if the job completed.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Downloaded { .. })
    }

    /// Returns `true` if the job failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }

    /// Returns `true` if the job failed with a transient error.
    pub fn is_retryable(&self) -> bool {
        match self {
            JobOutcome::Failed { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Number of images written by the job (zero on failure).
    pub fn images(&self) -> usize {
        match self {
            JobOutcome::Downloaded { images, .. } => *images,
            _ => 0,
        }
    }

    /// Number of headings skipped by the job (zero on failure).
    pub fn skipped(&self) -> usize {
        match self {
            JobOutcome::Downloaded { skipped, .. } => *skipped,
            _ => 0,
        }
    }
}

impl From<&crate::Error> for JobOutcome {
    fn from(err: &crate::Error) -> Self {
        JobOutcome::Failed {
            error: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}
