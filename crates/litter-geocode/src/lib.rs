#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Geocoding for litterview.
//!
//! Implements [`Geocoder`] for Google:
//! - `GET /maps/api/geocode/json?address=...&key=...`
//! - first result wins, as with any single-address lookup
//! - body statuses mapped onto [`litter_core::Error`] for retry decisions

use async_trait::async_trait;

pub mod client;
pub mod mock;
pub mod types;

pub use client::GeocodeClient;
pub use litter_core::DEFAULT_BASE_URL;
pub use mock::MockGeocoder;
pub use types::{GeocodeResult, Geometry, LatLng};

/// Resolves free-text addresses to a geocode result.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a single address, returning the best match.
    async fn geocode(&self, address: &str) -> litter_core::Result<GeocodeResult>;
}
