//! Pipeline runner: coordinates stage then image stage.

use std::sync::Arc;
use std::time::Instant;

use litter_core::{BlockId, Result, RunId, RunState, StageMetadata};
use litter_geocode::Geocoder;
use litter_streetview::ImageSource;
use serde::Serialize;

use crate::blocks::BlockTable;
use crate::config::PipelineConfig;
use crate::geocode::{geocode_blocks, GeocodedBlock};
use crate::output::write_geocoded;
use crate::pool::WorkerPool;
use crate::queue::JobQueue;

/// Result of the coordinates stage.
#[derive(Debug, Clone)]
pub struct CoordinatesReport {
    /// Input column headers.
    pub headers: Vec<String>,
    /// Every processed block, in input order.
    pub blocks: Vec<GeocodedBlock>,
    /// Stage timing.
    pub stage: StageMetadata,
}

impl CoordinatesReport {
    /// Number of blocks with coordinates.
    pub fn geocoded(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_geocoded()).count()
    }

    /// Blocks whose geocoding failed.
    pub fn failures(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|b| !b.is_geocoded())
            .map(|b| b.block.block_id.clone())
            .collect()
    }
}

/// Totals for a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Identifier of the run.
    pub run_id: RunId,
    /// Final state.
    pub state: RunState,
    /// Blocks read after limit and dedupe.
    pub blocks: usize,
    /// Blocks with coordinates.
    pub geocoded: usize,
    /// Blocks whose geocoding failed.
    pub geocode_failures: Vec<BlockId>,
    /// Image jobs queued.
    pub jobs: usize,
    /// Images written.
    pub images_downloaded: usize,
    /// Headings without imagery.
    pub images_skipped: usize,
    /// Blocks whose image job failed.
    pub failed_jobs: Vec<BlockId>,
    /// Per-stage timing.
    pub stages: Vec<StageMetadata>,
}

/// The litter block pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    geocoder: Arc<dyn Geocoder>,
    images: Arc<dyn ImageSource>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline.
    pub fn new(
        config: PipelineConfig,
        geocoder: Arc<dyn Geocoder>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        Self {
            config,
            geocoder,
            images,
        }
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reads the input CSV, then applies `limit` and optional dedupe.
    pub fn load_blocks(&self) -> Result<BlockTable> {
        let config = &self.config;
        let mut table = BlockTable::read(&config.input, &config.id_column, &config.address_column)?;
        table.truncate(config.limit);
        if config.dedupe_addresses {
            let removed = table.dedupe_addresses();
            if removed > 0 {
                tracing::info!(removed, "Dropped duplicate addresses");
            }
        }
        Ok(table)
    }

    /// Geocodes the input blocks and writes the augmented CSV.
    pub async fn extract_coordinates(&self) -> Result<CoordinatesReport> {
        self.config.validate()?;
        let mut stage = StageMetadata::start("geocode");
        tracing::info!(input = %self.config.input.display(), "Begin coordinates extraction");

        let table = self.load_blocks()?;
        let BlockTable { headers, rows } = table;
        let blocks = geocode_blocks(self.geocoder.as_ref(), rows, &self.config).await?;
        write_geocoded(&self.config.output, &headers, &blocks)?;

        stage.mark_completed();
        let report = CoordinatesReport {
            headers,
            blocks,
            stage,
        };
        tracing::info!(
            blocks = report.blocks.len(),
            geocoded = report.geocoded(),
            output = %self.config.output.display(),
            elapsed_ms = stage_ms(&report.stage),
            "End coordinates extraction"
        );
        Ok(report)
    }

    /// Downloads images for every geocoded block in `blocks`.
    pub async fn extract_images(
        &self,
        blocks: &[GeocodedBlock],
    ) -> Result<(Vec<(BlockId, litter_core::JobOutcome)>, StageMetadata)> {
        let mut stage = StageMetadata::start("images");
        let queue = JobQueue::from_blocks(blocks);
        let jobs = queue.len().await;
        tracing::info!(
            jobs,
            image_dir = %self.config.image_dir.display(),
            "Begin image extraction"
        );

        tokio::fs::create_dir_all(&self.config.image_dir).await?;
        let outcomes = WorkerPool::new(self.config.workers)
            .run(queue, Arc::clone(&self.images), &self.config.image_dir)
            .await?;

        stage.mark_completed();
        tracing::info!(
            jobs,
            elapsed_ms = stage_ms(&stage),
            "End image extraction"
        );
        Ok((outcomes, stage))
    }

    /// Runs both stages.
    pub async fn run(&self) -> Result<RunSummary> {
        let run_id = RunId::new();
        let started = Instant::now();
        tracing::info!(%run_id, state = %RunState::Geocoding, "Pipeline run started");

        let result = self.run_stages(run_id).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(summary) => tracing::info!(
                %run_id,
                state = %summary.state,
                images = summary.images_downloaded,
                elapsed_ms,
                "Pipeline run finished"
            ),
            Err(err) => tracing::error!(
                %run_id,
                state = %RunState::Failed,
                error = %err,
                elapsed_ms,
                "Pipeline run failed"
            ),
        }
        result
    }

    async fn run_stages(&self, run_id: RunId) -> Result<RunSummary> {
        let coordinates = self.extract_coordinates().await?;
        tracing::debug!(%run_id, state = %RunState::Extracting, "Entering image stage");
        let (outcomes, image_stage) = self.extract_images(&coordinates.blocks).await?;

        let failed_jobs: Vec<BlockId> = outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .map(|(id, _)| id.clone())
            .collect();

        Ok(RunSummary {
            run_id,
            state: final_state(outcomes.len(), failed_jobs.len()),
            blocks: coordinates.blocks.len(),
            geocoded: coordinates.geocoded(),
            geocode_failures: coordinates.failures(),
            jobs: outcomes.len(),
            images_downloaded: outcomes.iter().map(|(_, o)| o.images()).sum(),
            images_skipped: outcomes.iter().map(|(_, o)| o.skipped()).sum(),
            failed_jobs,
            stages: vec![coordinates.stage, image_stage],
        })
    }
}

/// A run with jobs, all of which failed, is [`RunState::Failed`].
fn final_state(jobs: usize, failed: usize) -> RunState {
    if jobs > 0 && failed == jobs {
        RunState::Failed
    } else {
        RunState::Completed
    }
}

fn stage_ms(stage: &StageMetadata) -> i64 {
    stage.duration().map(|d| d.num_milliseconds()).unwrap_or_default()
}
