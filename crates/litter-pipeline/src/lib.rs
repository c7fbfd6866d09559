#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocks;
pub mod config;
pub mod geocode;
pub mod output;
pub mod pool;
pub mod queue;
pub mod runner;

pub use blocks::{BlockTable, LitterBlock};
pub use config::PipelineConfig;
pub use geocode::{address_for, geocode_blocks, GeocodedBlock};
pub use output::{write_geocoded, GEOCODE_COLUMNS};
pub use pool::WorkerPool;
pub use queue::JobQueue;
pub use runner::{CoordinatesReport, Pipeline, RunSummary};

// Re-export core types
pub use litter_core::{Error, Result};
