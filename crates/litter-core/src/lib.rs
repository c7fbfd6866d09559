#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! litterview core library
//!
//! Core types, errors, and bookkeeping shared by the geocoding, imagery and
//! pipeline crates.

pub mod error;
pub mod retry;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use types::{
    BlockId, Coordinates, HeadingSweep, ImageJob, JobOutcome, RunId, RunState, StageMetadata,
};

/// Origin of the Google Maps web services. The geocoding and Street View
/// clients both append their API paths to it.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
