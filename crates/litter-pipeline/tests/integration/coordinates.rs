//! Integration tests for the coordinates stage.

use litter_core::Error;

use crate::common::{coords, philadelphia_geocoder, TestHarness, HEADER};

#[tokio::test]
async fn test_output_preserves_rows_and_appends_columns() {
    let harness = TestHarness::with_rows(&["1,A ST,2.5", "2,B ST,1.0"])
        .with_geocoder(philadelphia_geocoder());

    let report = harness
        .pipeline()
        .extract_coordinates()
        .await
        .expect("coordinates stage should succeed");
    assert_eq!(report.geocoded(), 2);

    let rows = harness.output_rows();
    assert_eq!(rows[0].join(","), format!("{HEADER},geocode_result,lat,lng"));
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][..3], &["1", "A ST", "2.5"]);
    assert_eq!(rows[1][4], "39.95");
    assert_eq!(rows[2][5], "-75.17");

    let raw: serde_json::Value = serde_json::from_str(&rows[1][3]).unwrap();
    assert_eq!(raw["geometry"]["location"]["lat"], 39.95);
}

#[tokio::test]
async fn test_addresses_get_city_suffix() {
    let harness = TestHarness::with_rows(&["1, A ST ,0"]).with_geocoder(philadelphia_geocoder());
    harness.pipeline().extract_coordinates().await.unwrap();
    assert_eq!(harness.geocoder.calls(), vec!["A ST, Philadelphia, PA"]);
}

#[tokio::test]
async fn test_limit_truncates_before_geocoding() {
    let mut harness = TestHarness::with_rows(&["1,A ST,0", "2,B ST,0", "3,C ST,0"])
        .with_geocoder(philadelphia_geocoder());
    harness.config.limit = Some(2);

    let report = harness.pipeline().extract_coordinates().await.unwrap();
    assert_eq!(report.blocks.len(), 2);
    assert_eq!(harness.geocoder.call_count(), 2);
    assert_eq!(harness.output_rows().len(), 3);
}

#[tokio::test]
async fn test_failed_rows_are_kept_with_empty_columns() {
    let harness = TestHarness::with_rows(&["1,A ST,0", "2,UNKNOWN ST,0", "3,C ST,0"])
        .with_geocoder(philadelphia_geocoder());

    let report = harness.pipeline().extract_coordinates().await.unwrap();
    assert_eq!(report.geocoded(), 2);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].as_str(), "2");

    let rows = harness.output_rows();
    assert_eq!(rows[2][0], "2");
    assert!(rows[2][3..].iter().all(String::is_empty));
    assert_eq!(rows[3][0], "3");
}

#[tokio::test]
async fn test_fail_fast_aborts_without_output() {
    let mut harness = TestHarness::with_rows(&["1,A ST,0", "2,B ST,0"])
        .with_geocoder(philadelphia_geocoder().with_failure("A ST, Philadelphia, PA", "REQUEST_DENIED"));
    harness.config.fail_fast = true;

    let err = harness.pipeline().extract_coordinates().await.unwrap_err();
    assert!(matches!(err, Error::ApiStatus { ref status, .. } if status == "REQUEST_DENIED"));
    assert!(!harness.config.output.exists());
}

#[tokio::test]
async fn test_dedupe_drops_repeated_addresses() {
    let mut harness = TestHarness::with_rows(&["1,A ST,0", "2,a st,0", "3,B ST,0"])
        .with_geocoder(philadelphia_geocoder());
    harness.config.dedupe_addresses = true;

    let report = harness.pipeline().extract_coordinates().await.unwrap();
    let ids: Vec<&str> = report.blocks.iter().map(|b| b.block.block_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[tokio::test]
async fn test_headers_only_input() {
    let harness = TestHarness::with_rows(&[]);
    let report = harness.pipeline().extract_coordinates().await.unwrap();
    assert!(report.blocks.is_empty());
    assert_eq!(harness.output_rows().len(), 1);
}

#[tokio::test]
async fn test_missing_address_column() {
    let mut harness = TestHarness::with_rows(&["1,A ST,0"]);
    harness.config.address_column = "ADDRESS".to_string();
    let err = harness.pipeline().extract_coordinates().await.unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column } if column == "ADDRESS"));
}

#[tokio::test]
async fn test_blank_addresses_are_not_geocoded() {
    let harness = TestHarness::with_rows(&["1,,0", "2,   ,0", "3,A ST,0"]).with_geocoder(
        philadelphia_geocoder().with_location(", Philadelphia, PA", coords(39.95, -75.16)),
    );

    let report = harness.pipeline().extract_coordinates().await.unwrap();

    assert_eq!(harness.geocoder.calls(), vec!["A ST, Philadelphia, PA"]);
    assert_eq!(report.geocoded(), 1);
    let failed: Vec<&str> = report.blocks[..2].iter().map(|b| b.block.block_id.as_str()).collect();
    assert_eq!(failed, vec!["1", "2"]);
    assert!(report.blocks[..2].iter().all(|b| b.result.is_none()));

    let rows = harness.output_rows();
    assert!(rows[1][3..].iter().all(String::is_empty));
    assert!(rows[2][3..].iter().all(String::is_empty));
}

#[tokio::test]
async fn test_duplicate_block_ids_abort_before_geocoding() {
    let harness = TestHarness::with_rows(&["1,A ST,0", "1,B ST,0"]).with_geocoder(philadelphia_geocoder());

    let err = harness.pipeline().extract_coordinates().await.unwrap_err();

    assert!(matches!(err, Error::Validation { ref message, .. } if message.contains("duplicate block id 1")));
    assert_eq!(harness.geocoder.call_count(), 0);
    assert!(!harness.config.output.exists());
}
