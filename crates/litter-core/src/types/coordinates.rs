//! Geographic coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A latitude/longitude pair in decimal degrees.
///
/// Displayed as `"{lat},{lng}"`, which is the `location` format the Street
/// View Static API expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, -90 to 90.
    pub lat: f64,
    /// Longitude in degrees, -180 to 180.
    pub lng: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use litter_core::Coordinates;
    ///
    /// let city_hall = Coordinates::new(39.9526, -75.1652).unwrap();
    /// assert_eq!(city_hall.to_string(), "39.9526,-75.1652");
    /// assert!(Coordinates::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::validation_field(
                "lat",
                format!("{lat} is outside -90..=90"),
            ));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::validation_field(
                "lng",
                format!("{lng} is outside -180..=180"),
            ));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| Error::validation(format!("expected 'lat,lng', got '{s}'")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::validation_field("lat", e.to_string()))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::validation_field("lng", e.to_string()))?;
        Self::new(lat, lng)
    }
}
