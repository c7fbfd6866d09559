//! Pipeline configuration.

use std::path::PathBuf;

use litter_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Litter Index Blocks CSV to read.
    pub input: PathBuf,
    /// Where the geocoded CSV is written.
    pub output: PathBuf,
    /// Root folder for per-block image folders.
    pub image_dir: PathBuf,
    /// Column holding the block identifier.
    pub id_column: String,
    /// Column holding the hundred-block street address.
    pub address_column: String,
    /// Appended to every address before geocoding.
    pub address_suffix: String,
    /// Process only the first N rows (API calls are billed).
    pub limit: Option<usize>,
    /// Drop rows whose address was already seen.
    pub dedupe_addresses: bool,
    /// Image workers; 0 means two per available CPU.
    pub workers: usize,
    /// Geocode requests in flight at once.
    pub geocode_concurrency: usize,
    /// Abort the run on the first geocoding failure.
    pub fail_fast: bool,
}

impl PipelineConfig {
    /// Checks settings that would otherwise fail mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.id_column.trim().is_empty() {
            return Err(Error::validation_field("id_column", "must not be empty"));
        }
        if self.address_column.trim().is_empty() {
            return Err(Error::validation_field("address_column", "must not be empty"));
        }
        if self.id_column == self.address_column {
            return Err(Error::validation_field(
                "address_column",
                "must differ from id_column",
            ));
        }
        if self.geocode_concurrency == 0 {
            return Err(Error::validation_field(
                "geocode_concurrency",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/Litter_Index_Blocks.csv"),
            output: PathBuf::from("data/Litter_Index_Blocks_With_Coords.csv"),
            image_dir: PathBuf::from("image_downloads"),
            id_column: "OBJECTID".to_string(),
            address_column: "LR_HUNDRED_BLOCK".to_string(),
            address_suffix: ", Philadelphia, PA".to_string(),
            limit: None,
            dedupe_addresses: false,
            workers: 0,
            geocode_concurrency: 1,
            fail_fast: false,
        }
    }
}
