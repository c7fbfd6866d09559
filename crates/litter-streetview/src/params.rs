//! Street View Static API request parameters.

use std::fmt;

use litter_core::{Coordinates, Error, HeadingSweep, Result};
use serde::{Deserialize, Serialize};

/// Output image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl ImageSize {
    /// Largest side the Static API serves.
    pub const MAX_SIDE: u16 = 640;

    /// Creates a validated size.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        for (field, value) in [("width", width), ("height", height)] {
            if value == 0 || value > Self::MAX_SIDE {
                return Err(Error::validation_field(
                    field,
                    format!("{value} must be between 1 and {}", Self::MAX_SIDE),
                ));
            }
        }
        Ok(Self { width, height })
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-run image request settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// Image dimensions.
    pub size: ImageSize,
    /// Camera pitch in degrees (0 is level, positive is up).
    pub pitch: i8,
    /// Horizontal field of view in degrees.
    pub fov: u8,
    /// Headings requested per location.
    pub sweep: HeadingSweep,
}

impl ImageOptions {
    /// Checks pitch and field-of-view ranges accepted by the API.
    pub fn validate(&self) -> Result<()> {
        if !(-90..=90).contains(&self.pitch) {
            return Err(Error::validation_field(
                "pitch",
                format!("{} must be between -90 and 90", self.pitch),
            ));
        }
        if self.fov == 0 || self.fov > 120 {
            return Err(Error::validation_field(
                "fov",
                format!("{} must be between 1 and 120", self.fov),
            ));
        }
        Ok(())
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            size: ImageSize::default(),
            pitch: 0,
            fov: 90,
            sweep: HeadingSweep::default(),
        }
    }
}

/// Parameters of one image (or metadata) request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreetViewParams {
    /// Image dimensions.
    pub size: ImageSize,
    /// Location to photograph.
    pub location: Coordinates,
    /// Compass heading in degrees.
    pub heading: u16,
    /// Camera pitch in degrees.
    pub pitch: i8,
    /// Horizontal field of view in degrees.
    pub fov: u8,
}

impl StreetViewParams {
    /// Query pairs for this request, including the API key.
    pub fn query_pairs(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("size", self.size.to_string()),
            ("location", self.location.to_string()),
            ("heading", self.heading.to_string()),
            ("pitch", self.pitch.to_string()),
            ("fov", self.fov.to_string()),
            ("key", api_key.to_string()),
        ]
    }
}

/// One request per heading of the sweep, in heading order.
pub fn build_params(location: Coordinates, options: &ImageOptions) -> Vec<StreetViewParams> {
    options
        .sweep
        .headings()
        .into_iter()
        .map(|heading| StreetViewParams {
            size: options.size,
            location,
            heading,
            pitch: options.pitch,
            fov: options.fov,
        })
        .collect()
}
