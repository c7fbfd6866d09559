//! Core types for litterview runs.

mod coordinates;
mod heading;
mod ids;
mod job;
mod proptests;
mod run_state;

pub use coordinates::Coordinates;
pub use heading::HeadingSweep;
pub use ids::{BlockId, RunId};
pub use job::{ImageJob, JobOutcome};
pub use run_state::{RunState, StageMetadata};
