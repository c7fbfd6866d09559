//! In-memory geocoder for tests and dry runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use litter_core::{Coordinates, Error, Result};
use serde_json::json;

use crate::types::GeocodeResult;
use crate::Geocoder;

/// A [`Geocoder`] that answers from a fixed table of addresses.
///
/// Unknown addresses produce [`Error::NoResults`]. Every call is recorded
/// so tests can assert on the addresses the pipeline built.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    locations: HashMap<String, Coordinates>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockGeocoder {
    /// Create an empty mock that knows no addresses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `address` with the given location.
    pub fn with_location(mut self, address: impl Into<String>, coordinates: Coordinates) -> Self {
        self.locations.insert(address.into(), coordinates);
        self
    }

    /// Answer `address` with an API error carrying `status`.
    pub fn with_failure(mut self, address: impl Into<String>, status: impl Into<String>) -> Self {
        self.failures.insert(address.into(), status.into());
        self
    }

    /// Addresses requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(address.to_string());
        }

        if let Some(status) = self.failures.get(address) {
            return Err(Error::api_status("geocode", status.as_str(), "mock failure"));
        }

        let coordinates = self.locations.get(address).ok_or_else(|| Error::NoResults {
            address: address.to_string(),
        })?;

        GeocodeResult::from_value(json!({
            "formatted_address": address,
            "geometry": {
                "location": { "lat": coordinates.lat, "lng": coordinates.lng },
                "location_type": "RANGE_INTERPOLATED"
            },
            "place_id": format!("mock:{address}"),
            "types": ["street_address"]
        }))
    }
}
