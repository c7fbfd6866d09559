//! `coords` and `images` command handlers.

use std::sync::Arc;

use litter_geocode::{GeocodeClient, Geocoder};
use litter_pipeline::{CoordinatesReport, Pipeline, PipelineConfig, RunSummary};
use litter_streetview::{ImageSource, StreetViewClient};

use crate::cli::{Cli, Command, ImageArgs, StageArgs};
use crate::config::LitterviewConfig;
use crate::config_handlers::handle_config_command;
use crate::error::Result;

/// Runs the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Coords(args) => {
            let config = LitterviewConfig::load(config_path)?;
            let report = cmd_coords(&config, &args).await?;
            print_coordinates(&report, &coords_pipeline_config(&config, &args));
            Ok(())
        }
        Command::Images(args) => {
            let config = LitterviewConfig::load(config_path)?;
            let summary = cmd_images(&config, &args).await?;
            print_summary(&summary)
        }
        Command::Config { action } => handle_config_command(config_path, action),
    }
}

/// Geocodes the blocks and writes the augmented CSV.
pub async fn cmd_coords(config: &LitterviewConfig, args: &StageArgs) -> Result<CoordinatesReport> {
    let pipeline = build_pipeline(config, coords_pipeline_config(config, args))?;
    Ok(pipeline.extract_coordinates().await?)
}

/// Geocodes the blocks, then downloads their Street View images.
pub async fn cmd_images(config: &LitterviewConfig, args: &ImageArgs) -> Result<RunSummary> {
    let mut pipeline_config = config.pipeline.clone();
    args.apply(&mut pipeline_config);
    let pipeline = build_pipeline(config, pipeline_config)?;
    Ok(pipeline.run().await?)
}

fn coords_pipeline_config(config: &LitterviewConfig, args: &StageArgs) -> PipelineConfig {
    let mut pipeline_config = config.pipeline.clone();
    args.apply(&mut pipeline_config);
    pipeline_config
}

/// Wires the Google clients into a pipeline.
pub fn build_pipeline(config: &LitterviewConfig, pipeline: PipelineConfig) -> Result<Pipeline> {
    let api_key = config.google.api_key()?;
    let retry = config.google.retry_policy();
    let options = config.imagery.options()?;

    let geocoder: Arc<dyn Geocoder> = Arc::new(
        GeocodeClient::new(api_key.clone())
            .with_base_url(config.google.base_url.clone())
            .with_retry(retry),
    );
    let images: Arc<dyn ImageSource> = Arc::new(
        StreetViewClient::new(api_key)
            .with_base_url(config.google.base_url.clone())
            .with_options(options)
            .with_retry(retry),
    );

    tracing::debug!(
        base_url = %config.google.base_url,
        workers = pipeline.workers,
        limit = ?pipeline.limit,
        "Pipeline configured"
    );
    Ok(Pipeline::new(pipeline, geocoder, images))
}

fn print_coordinates(report: &CoordinatesReport, config: &PipelineConfig) {
    println!(
        "Geocoded {} of {} blocks -> {}",
        report.geocoded(),
        report.blocks.len(),
        config.output.display()
    );
    for failed in report.blocks.iter().filter(|b| !b.is_geocoded()) {
        println!(
            "  block {} ({}): {}",
            failed.block.block_id,
            failed.address,
            failed.error.as_deref().unwrap_or("no coordinates")
        );
    }
}

fn print_summary(summary: &RunSummary) -> Result<()> {
    println!(
        "Run {} {}: {} blocks, {} geocoded, {} images downloaded, {} headings skipped, {} failed jobs",
        summary.run_id,
        summary.state,
        summary.blocks,
        summary.geocoded,
        summary.images_downloaded,
        summary.images_skipped,
        summary.failed_jobs.len()
    );
    match serde_json::to_string_pretty(summary) {
        Ok(json) => tracing::debug!(summary = %json, "Run summary"),
        Err(e) => tracing::warn!(error = %e, "Could not render run summary"),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn keyed_config() -> LitterviewConfig {
        let mut config = LitterviewConfig::default();
        config.google.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_build_pipeline_applies_settings() {
        let pipeline_config = PipelineConfig {
            workers: 6,
            ..PipelineConfig::default()
        };
        let pipeline = build_pipeline(&keyed_config(), pipeline_config).unwrap();
        assert_eq!(pipeline.config().workers, 6);
    }

    #[test]
    fn test_build_pipeline_rejects_bad_imagery() {
        let mut config = keyed_config();
        config.imagery.heading_step = 0;
        assert!(build_pipeline(&config, PipelineConfig::default()).is_err());
    }

    #[test]
    fn test_coords_flags_override_file() {
        let mut config = keyed_config();
        config.pipeline.limit = Some(100);
        let args = StageArgs {
            output: Some(PathBuf::from("elsewhere.csv")),
            limit: Some(2),
            ..StageArgs::default()
        };
        let pipeline_config = coords_pipeline_config(&config, &args);
        assert_eq!(pipeline_config.limit, Some(2));
        assert_eq!(pipeline_config.output, PathBuf::from("elsewhere.csv"));
    }

    #[tokio::test]
    async fn test_cmd_coords_missing_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = StageArgs {
            input: Some(dir.path().join("missing.csv")),
            output: Some(dir.path().join("out.csv")),
            limit: None,
        };
        let err = cmd_coords(&keyed_config(), &args).await.unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
    }
}
