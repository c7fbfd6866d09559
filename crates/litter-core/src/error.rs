//! Error types for the litterview core library.

/// Google API statuses that indicate a transient condition.
const TRANSIENT_API_STATUSES: &[&str] = &["OVER_QUERY_LIMIT", "OVER_DAILY_LIMIT", "UNKNOWN_ERROR"];

/// Errors that can occur while geocoding blocks or extracting imagery.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Geocoding failure that is not tied to a specific API status.
    #[error("Geocode error: {message}")]
    Geocode {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Street View image or metadata retrieval failure.
    #[error("Image fetch error: {message}")]
    ImageFetch {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport-level HTTP failure or non-success response.
    #[error("HTTP error: {message}")]
    Http {
        /// What went wrong
        message: String,
        /// Response status code, if a response was received
        status: Option<u16>,
    },

    /// The API answered, but with a non-OK status in the body.
    #[error("{service} API returned {status}: {message}")]
    ApiStatus {
        /// Which API answered (e.g. "geocode", "streetview")
        service: String,
        /// Status string from the response body
        status: String,
        /// Error message from the response body, possibly empty
        message: String,
    },

    /// The geocoder found no match for an address.
    #[error("No geocode results for address: {address}")]
    NoResults {
        /// Address that produced no results
        address: String,
    },

    /// Input validation error
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A required column is missing from the input CSV.
    #[error("Missing column in input: {column}")]
    MissingColumn {
        /// Column header that was expected
        column: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timed out
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },
}

/// Convenience `Result` type alias for litterview operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Retryable errors are transient: connection failures, rate limits,
    /// server-side errors and timeouts.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http { status: None, .. } => true,
            Error::Http {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
            Error::ApiStatus { status, .. } => TRANSIENT_API_STATUSES.contains(&status.as_str()),
            Error::Timeout { .. } => true,
            Error::Io(_) => true,
            Error::Geocode { .. } => false,
            Error::ImageFetch { .. } => false,
            Error::NoResults { .. } => false,
            Error::Validation { .. } => false,
            Error::Config { .. } => false,
            Error::MissingColumn { .. } => false,
            Error::Csv(_) => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates a new geocode error with a message.
    pub fn geocode<S: Into<String>>(message: S) -> Self {
        Error::Geocode {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new geocode error with a message and source error.
    pub fn geocode_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Geocode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new image fetch error with a message.
    pub fn image_fetch<S: Into<String>>(message: S) -> Self {
        Error::ImageFetch {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new image fetch error with a message and source error.
    pub fn image_fetch_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::ImageFetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new HTTP error.
    pub fn http<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        Error::Http {
            message: message.into(),
            status,
        }
    }

    /// Creates a new API status error.
    pub fn api_status<A, S, M>(service: A, status: S, message: M) -> Self
    where
        A: Into<String>,
        S: Into<String>,
        M: Into<String>,
    {
        Error::ApiStatus {
            service: service.into(),
            status: status.into(),
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
