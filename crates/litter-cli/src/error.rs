//! Error types for litter-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for litter-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in litter-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the pipeline crates
    #[error(transparent)]
    Core(#[from] litter_core::Error),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error on a config file
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this tool
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
