#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::Path;

use async_trait::async_trait;
use litter_core::{ImageJob, Result};

pub mod client;
pub mod download;
pub mod metadata;
pub mod mock;
pub mod params;

pub use client::StreetViewClient;
pub use download::{redact_key, save_links, DownloadReport, LINKS_FILE, METADATA_FILE};
pub use metadata::Metadata;
pub use mock::MockImageSource;
pub use params::{build_params, ImageOptions, ImageSize, StreetViewParams};

/// Produces the images for one block.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Extract the images for `job` into `root/<block id>`.
    async fn extract(&self, job: &ImageJob, root: &Path) -> Result<DownloadReport>;
}
