//! Run state tracking types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The current state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RunState {
    /// Run has been created but not yet started.
    Pending,

    /// Block addresses are being geocoded.
    Geocoding,

    /// Street View images are being extracted.
    Extracting,

    /// Run has completed.
    Completed,

    /// Run has failed and cannot proceed.
    Failed,
}

impl RunState {
    /// Returns `true` if the run is in a terminal state (Completed or Failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }

    /// Returns `true` if the run is active (Geocoding or Extracting).
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Geocoding | RunState::Extracting)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Pending => write!(f, "pending"),
            RunState::Geocoding => write!(f, "geocoding"),
            RunState::Extracting => write!(f, "extracting"),
            RunState::Completed => write!(f, "completed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Timing metadata for one stage of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetadata {
    /// Stage name (e.g. "geocode", "images")
    pub stage: String,

    /// When this stage started
    pub started_at: DateTime<Utc>,

    /// When this stage completed (if finished)
    pub completed_at: Option<DateTime<Utc>>,
}

impl StageMetadata {
    /// Creates stage metadata starting now.
    pub fn start(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Marks this stage as completed.
    pub fn mark_completed(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Returns the duration of this stage.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at
            .map(|end| end.signed_duration_since(self.started_at))
    }

    /// Returns `true` if the stage has completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
