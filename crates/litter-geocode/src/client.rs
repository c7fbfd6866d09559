//! HTTP client for the Google Geocoding API.

use async_trait::async_trait;
use litter_core::{Error, Result, RetryPolicy, DEFAULT_BASE_URL};

use crate::types::{GeocodeResponse, GeocodeResult};
use crate::Geocoder;

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

/// Geocoding API client with retry on transient failures.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl GeocodeClient {
    /// Create a client for the public Google endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at a different host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Host the geocode path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Share an existing reqwest client (connection pool).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), GEOCODE_PATH)
    }

    /// A single request, without retries.
    async fn geocode_once(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(
                format!("geocode request returned HTTP {status}"),
                Some(status.as_u16()),
            ));
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| {
            Error::geocode_with_source("geocode response parse failed", e.without_url())
        })?;

        body.into_first_result(address)
    }
}

/// Maps a reqwest failure, dropping the URL so the API key never reaches logs.
fn transport_error(err: reqwest::Error) -> Error {
    let status = err.status().map(|s| s.as_u16());
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    Error::http(format!("geocode {kind}: {}", err.without_url()), status)
}

#[async_trait]
impl Geocoder for GeocodeClient {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::validation_field("address", "must not be empty"));
        }

        tracing::debug!(address, "Geocoding address");
        let result = self
            .retry
            .run("geocode", || self.geocode_once(address))
            .await?;
        tracing::debug!(
            address,
            lat = result.lat(),
            lng = result.lng(),
            "Address geocoded"
        );
        Ok(result)
    }
}
