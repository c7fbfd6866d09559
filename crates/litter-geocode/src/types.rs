//! Geocoding API response types.

use litter_core::{Coordinates, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A latitude/longitude pair as returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// The `geometry` object of a geocode result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geocoded location.
    pub location: LatLng,
    /// Precision of the location (e.g. `ROOFTOP`, `RANGE_INTERPOLATED`).
    #[serde(default)]
    pub location_type: Option<String>,
}

/// One result from the Geocoding API.
///
/// The typed fields cover what the pipeline reads; the complete JSON object
/// is kept in [`GeocodeResult::raw`] so it can be written out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Human-readable address of the match.
    #[serde(default)]
    pub formatted_address: String,
    /// Stable Google place identifier.
    #[serde(default)]
    pub place_id: Option<String>,
    /// Feature types of the match (e.g. `street_address`, `route`).
    #[serde(default)]
    pub types: Vec<String>,
    /// Location geometry.
    pub geometry: Geometry,
    #[serde(skip)]
    raw: Value,
}

impl GeocodeResult {
    /// Builds a result from one element of the API's `results` array.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut result: GeocodeResult = serde_json::from_value(value.clone())?;
        result.raw = value;
        Ok(result)
    }

    /// The raw JSON object this result was parsed from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Compact JSON encoding of the raw result.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.raw)?)
    }

    /// Latitude from `geometry.location.lat`.
    pub fn lat(&self) -> f64 {
        self.geometry.location.lat
    }

    /// Longitude from `geometry.location.lng`.
    pub fn lng(&self) -> f64 {
        self.geometry.location.lng
    }

    /// Validated coordinates of the match.
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::new(self.lat(), self.lng())
    }
}

/// Top-level Geocoding API response.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GeocodeResponse {
    /// Maps the response onto the first result or an error.
    pub fn into_first_result(self, address: &str) -> Result<GeocodeResult> {
        match self.status.as_str() {
            "OK" => match self.results.into_iter().next() {
                Some(value) => GeocodeResult::from_value(value),
                None => Err(Error::NoResults {
                    address: address.to_string(),
                }),
            },
            "ZERO_RESULTS" => Err(Error::NoResults {
                address: address.to_string(),
            }),
            other => Err(Error::api_status(
                "geocode",
                other,
                self.error_message.unwrap_or_default(),
            )),
        }
    }
}
