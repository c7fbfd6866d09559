//! Street View metadata responses.

use litter_core::Coordinates;
use serde::{Deserialize, Serialize};

/// Statuses that describe the panorama rather than the request itself.
pub(crate) const PANORAMA_STATUSES: &[&str] = &["OK", "ZERO_RESULTS", "NOT_FOUND"];

/// Metadata for one heading request.
///
/// The API fields are extended with the request `heading` and, once the
/// image has been saved, its `file` name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// `OK` when imagery exists for the location.
    pub status: String,
    /// Panorama identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pano_id: Option<String>,
    /// Capture date, `YYYY-MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Location of the panorama (snapped to the road).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    /// Attribution text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Error details for non-OK statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Heading of the request this metadata belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<u16>,
    /// Name of the saved image file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Metadata {
    /// Returns `true` if imagery is available for the request.
    pub fn is_available(&self) -> bool {
        self.status == "OK"
    }

    /// Returns `true` if the status describes the panorama, not a request failure.
    pub(crate) fn is_panorama_status(&self) -> bool {
        PANORAMA_STATUSES.contains(&self.status.as_str())
    }
}
