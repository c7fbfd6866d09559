//! Common test utilities and harness for pipeline integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use litter_core::Coordinates;
use litter_geocode::MockGeocoder;
use litter_pipeline::{Pipeline, PipelineConfig};
use litter_streetview::MockImageSource;
use tempfile::TempDir;

/// Header row of the sample blocks CSV.
pub const HEADER: &str = "OBJECTID,LR_HUNDRED_BLOCK,LITTER_SCORE";

/// Test harness: a temp directory holding the input CSV, plus mocks.
pub struct TestHarness {
    /// Keeps the directory alive for the test's duration.
    pub dir: TempDir,
    /// Pipeline settings pointing into `dir`.
    pub config: PipelineConfig,
    /// Geocoder shared with the pipeline.
    pub geocoder: Arc<MockGeocoder>,
    /// Image source shared with the pipeline.
    pub images: Arc<MockImageSource>,
}

impl TestHarness {
    /// Creates a harness whose input CSV has `rows` below [`HEADER`].
    pub fn with_rows(rows: &[&str]) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let input = dir.path().join("data").join("Litter_Index_Blocks.csv");
        std::fs::create_dir_all(input.parent().expect("parent")).expect("data dir");

        let mut csv = String::from(HEADER);
        csv.push('\n');
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        std::fs::write(&input, csv).expect("write input");

        let config = PipelineConfig {
            input,
            output: dir.path().join("data").join("Litter_Index_Blocks_With_Coords.csv"),
            image_dir: dir.path().join("image_downloads"),
            workers: 3,
            ..PipelineConfig::default()
        };

        Self {
            dir,
            config,
            geocoder: Arc::new(MockGeocoder::new()),
            images: Arc::new(MockImageSource::new(8)),
        }
    }

    /// Replaces the geocoder.
    pub fn with_geocoder(mut self, geocoder: MockGeocoder) -> Self {
        self.geocoder = Arc::new(geocoder);
        self
    }

    /// Replaces the image source.
    pub fn with_images(mut self, images: MockImageSource) -> Self {
        self.images = Arc::new(images);
        self
    }

    /// Builds a pipeline over the harness mocks.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.config.clone(), self.geocoder.clone(), self.images.clone())
    }

    /// Folder the images of `block_id` land in.
    pub fn block_dir(&self, block_id: &str) -> PathBuf {
        self.config.image_dir.join(block_id)
    }

    /// Parsed rows of the output CSV, header first.
    pub fn output_rows(&self) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.config.output)
            .expect("open output");
        reader
            .records()
            .map(|r| r.expect("record").iter().map(str::to_string).collect())
            .collect()
    }
}

/// A geocoder knowing the Philadelphia addresses of blocks `A ST`, `B ST`
/// and `C ST`.
pub fn philadelphia_geocoder() -> MockGeocoder {
    MockGeocoder::new()
        .with_location("A ST, Philadelphia, PA", coords(39.95, -75.16))
        .with_location("B ST, Philadelphia, PA", coords(39.96, -75.17))
        .with_location("C ST, Philadelphia, PA", coords(39.97, -75.18))
}

/// Shorthand for valid coordinates.
pub fn coords(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).expect("valid coordinates")
}
