//! Integration tests for the full run, images included.

use std::time::Duration;

use litter_core::RunState;
use litter_streetview::MockImageSource;

use crate::common::{philadelphia_geocoder, TestHarness};

#[tokio::test]
async fn test_run_downloads_one_folder_per_geocoded_block() {
    let harness = TestHarness::with_rows(&["1,A ST,0", "2,B ST,0", "3,NOWHERE,0"])
        .with_geocoder(philadelphia_geocoder());

    let summary = harness.pipeline().run().await.expect("run should succeed");

    assert_eq!(summary.state, RunState::Completed);
    assert_eq!(summary.jobs, 2);
    assert_eq!(summary.images_downloaded, 16);
    assert_eq!(summary.geocode_failures.len(), 1);
    for block in ["1", "2"] {
        for index in 0..8 {
            assert!(harness.block_dir(block).join(format!("gsv_{index}.jpg")).exists());
        }
    }
    assert!(!harness.block_dir("3").exists());
}

#[tokio::test]
async fn test_every_job_runs_once_with_many_workers() {
    let rows: Vec<String> = (1..=3).map(|i| format!("{i},{} ST,0", ['A', 'B', 'C'][i - 1])).collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let mut harness = TestHarness::with_rows(&rows)
        .with_geocoder(philadelphia_geocoder())
        .with_images(MockImageSource::new(1).with_delay(Duration::from_millis(10)));
    harness.config.workers = 16;

    let summary = harness.pipeline().run().await.unwrap();

    assert_eq!(summary.jobs, 3);
    let mut calls: Vec<String> = harness.images.calls().iter().map(|b| b.to_string()).collect();
    calls.sort();
    assert_eq!(calls, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_failed_job_is_reported_and_others_finish() {
    let harness = TestHarness::with_rows(&["1,A ST,0", "2,B ST,0", "3,C ST,0"])
        .with_geocoder(philadelphia_geocoder())
        .with_images(MockImageSource::new(2).with_failure("2"));

    let summary = harness.pipeline().run().await.unwrap();

    assert_eq!(summary.state, RunState::Completed);
    assert_eq!(summary.failed_jobs.len(), 1);
    assert_eq!(summary.failed_jobs[0].as_str(), "2");
    assert_eq!(summary.images_downloaded, 4);
    assert!(harness.block_dir("3").join("gsv_1.jpg").exists());
}

#[tokio::test]
async fn test_empty_input_runs_zero_jobs() {
    let harness = TestHarness::with_rows(&[]);
    let summary = harness.pipeline().run().await.unwrap();
    assert_eq!(summary.blocks, 0);
    assert_eq!(summary.jobs, 0);
    assert_eq!(harness.images.call_count(), 0);
    assert_eq!(summary.stages.len(), 2);
}

#[tokio::test]
async fn test_run_fails_when_every_job_fails() {
    let harness = TestHarness::with_rows(&["1,A ST,0", "2,B ST,0"])
        .with_geocoder(philadelphia_geocoder())
        .with_images(MockImageSource::new(2).with_failure("1").with_failure("2"));

    let summary = harness.pipeline().run().await.unwrap();

    assert_eq!(summary.state, RunState::Failed);
    assert_eq!(summary.failed_jobs.len(), 2);
    assert_eq!(harness.images.call_count(), 2);
}
