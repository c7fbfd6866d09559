//! Identifier types for runs and blocks.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{Error, Result};

/// Unique identifier for a pipeline run.
///
/// Internally represented as a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use litter_core::RunId;
    ///
    /// let id = RunId::new();
    /// println!("Run ID: {}", id);
    /// ```
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Converts to the inner UUID.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a litter index block (the `OBJECTID` column).
///
/// The block ID doubles as the name of the folder its images are saved in,
/// so [`BlockId::parse`] rejects values that are not a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    /// Creates a block ID without validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use litter_core::BlockId;
    ///
    /// let id = BlockId::new("1042");
    /// assert_eq!(id.as_str(), "1042");
    /// ```
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Parses a block ID from raw CSV text.
    ///
    /// Surrounding whitespace is trimmed. Empty values, `.`/`..`, and values
    /// containing path separators are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(Error::validation_field("block_id", "must not be empty"));
        }
        if id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(Error::validation_field(
                "block_id",
                format!("'{id}' is not usable as a folder name"),
            ));
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the block ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
