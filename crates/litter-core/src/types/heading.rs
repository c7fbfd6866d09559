//! Compass heading sweeps for Street View requests.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A sweep of compass headings around a location.
///
/// Produces `start, start + step, ...` for every value below 360. The default
/// sweep is 0..360 in 45 degree increments, i.e. eight images per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingSweep {
    /// First heading in degrees, 0 to 359.
    pub start: u16,
    /// Increment between headings in degrees, 1 to 360.
    pub step: u16,
}

impl HeadingSweep {
    /// Default increment between headings.
    pub const DEFAULT_STEP: u16 = 45;

    /// Creates a validated sweep.
    pub fn new(start: u16, step: u16) -> Result<Self> {
        if start >= 360 {
            return Err(Error::validation_field(
                "heading_start",
                format!("{start} must be below 360"),
            ));
        }
        if step == 0 || step > 360 {
            return Err(Error::validation_field(
                "heading_step",
                format!("{step} must be between 1 and 360"),
            ));
        }
        Ok(Self { start, step })
    }

    /// Returns the headings of this sweep in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use litter_core::HeadingSweep;
    ///
    /// let sweep = HeadingSweep::default();
    /// assert_eq!(sweep.headings(), vec![0, 45, 90, 135, 180, 225, 270, 315]);
    /// ```
    pub fn headings(&self) -> Vec<u16> {
        (self.start..360).step_by(usize::from(self.step.max(1))).collect()
    }

    /// Number of headings in this sweep.
    pub fn len(&self) -> usize {
        self.headings().len()
    }

    /// Returns `true` if the sweep yields no headings.
    pub fn is_empty(&self) -> bool {
        self.start >= 360
    }
}

impl Default for HeadingSweep {
    fn default() -> Self {
        Self {
            start: 0,
            step: Self::DEFAULT_STEP,
        }
    }
}
