//! HTTP client for the Street View Static API.

use std::path::Path;

use async_trait::async_trait;
use litter_core::{Error, ImageJob, Result, RetryPolicy, DEFAULT_BASE_URL};
use reqwest::Url;

use crate::download::{image_file_name, save_links, write_metadata, DownloadReport};
use crate::download::{LINKS_FILE, METADATA_FILE};
use crate::metadata::Metadata;
use crate::params::{build_params, ImageOptions, StreetViewParams};
use crate::ImageSource;

const IMAGE_PATH: &str = "/maps/api/streetview";
const METADATA_PATH: &str = "/maps/api/streetview/metadata";

/// Street View Static API client.
///
/// Metadata requests are free of charge; image requests are billed. Every
/// heading's metadata is checked before its image is requested.
#[derive(Debug, Clone)]
pub struct StreetViewClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    options: ImageOptions,
    retry: RetryPolicy,
}

impl StreetViewClient {
    /// Create a client with default image options.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            options: ImageOptions::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at a different host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the image options.
    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
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

    /// Image options used for every job.
    pub fn options(&self) -> &ImageOptions {
        &self.options
    }

    /// Host the API paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &StreetViewParams) -> Result<Url> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        Url::parse_with_params(&endpoint, params.query_pairs(&self.api_key))
            .map_err(|e| Error::config(format!("invalid Street View URL '{endpoint}': {e}")))
    }

    /// URL of the image for `params`.
    pub fn image_url(&self, params: &StreetViewParams) -> Result<Url> {
        self.url(IMAGE_PATH, params)
    }

    /// URL of the metadata for `params`.
    pub fn metadata_url(&self, params: &StreetViewParams) -> Result<Url> {
        self.url(METADATA_PATH, params)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(
                format!("street view request returned HTTP {status}"),
                Some(status.as_u16()),
            ));
        }
        Ok(response)
    }

    async fn fetch_metadata_once(&self, params: &StreetViewParams) -> Result<Metadata> {
        let response = self.get(self.metadata_url(params)?).await?;
        let metadata: Metadata = response.json().await.map_err(|e| {
            Error::image_fetch_with_source("metadata response parse failed", e.without_url())
        })?;

        if !metadata.is_panorama_status() {
            return Err(Error::api_status(
                "streetview",
                metadata.status,
                metadata.error_message.unwrap_or_default(),
            ));
        }
        Ok(metadata)
    }

    async fn fetch_image_once(&self, params: &StreetViewParams) -> Result<Vec<u8>> {
        let response = self.get(self.image_url(params)?).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::image_fetch_with_source("image body read failed", e.without_url()))?;
        Ok(bytes.to_vec())
    }

    /// Metadata for one heading request.
    ///
    /// `ZERO_RESULTS` and `NOT_FOUND` are returned as metadata, not errors.
    pub async fn fetch_metadata(&self, params: &StreetViewParams) -> Result<Metadata> {
        self.retry
            .run("streetview metadata", || self.fetch_metadata_once(params))
            .await
    }

    /// Image bytes for one heading request.
    pub async fn fetch_image(&self, params: &StreetViewParams) -> Result<Vec<u8>> {
        self.retry
            .run("streetview image", || self.fetch_image_once(params))
            .await
    }

    async fn fetch_headings(
        &self,
        job: &ImageJob,
        dir: &Path,
        requests: &[StreetViewParams],
        progress: &mut BlockProgress,
    ) -> Result<()> {
        for (index, params) in requests.iter().enumerate() {
            progress.links.push(self.image_url(params)?);

            let mut metadata = self.fetch_metadata(params).await?;
            metadata.heading = Some(params.heading);

            if metadata.is_available() {
                let bytes = self.fetch_image(params).await?;
                let file = image_file_name(index);
                let path = dir.join(&file);
                tokio::fs::write(&path, &bytes).await.map_err(|e| {
                    Error::image_fetch_with_source(format!("failed to write {}", path.display()), e)
                })?;
                metadata.file = Some(file);
                progress.report.downloaded += 1;
                progress.report.files.push(path);
            } else {
                tracing::debug!(
                    block_id = %job.block_id,
                    heading = params.heading,
                    status = %metadata.status,
                    "No imagery for heading"
                );
                progress.report.skipped += 1;
            }
            progress.entries.push(metadata);
        }
        Ok(())
    }
}

/// What has been fetched for one block so far.
#[derive(Debug, Default)]
struct BlockProgress {
    report: DownloadReport,
    entries: Vec<Metadata>,
    links: Vec<Url>,
}

impl BlockProgress {
    async fn save(&self, dir: &Path) -> Result<()> {
        write_metadata(&self.entries, &dir.join(METADATA_FILE)).await?;
        save_links(&self.links, &dir.join(LINKS_FILE)).await
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
    Error::http(format!("street view {kind}: {}", err.without_url()), status)
}

#[async_trait]
impl ImageSource for StreetViewClient {
    async fn extract(&self, job: &ImageJob, root: &Path) -> Result<DownloadReport> {
        let dir = root.join(job.folder_name());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            Error::image_fetch_with_source(format!("failed to create {}", dir.display()), e)
        })?;

        let requests = build_params(job.coordinates, &self.options);
        tracing::info!(
            block_id = %job.block_id,
            location = %job.coordinates,
            headings = requests.len(),
            folder = %dir.display(),
            "Saving images"
        );

        let mut progress = BlockProgress::default();
        let fetched = self.fetch_headings(job, &dir, &requests, &mut progress).await;
        // Headings fetched before a failure are still recorded.
        let saved = progress.save(&dir).await;
        if let Err(err) = fetched {
            tracing::warn!(
                block_id = %job.block_id,
                recorded = progress.entries.len(),
                error = %err,
                "Block folder left incomplete"
            );
            return Err(err);
        }
        saved?;

        let report = progress.report;
        tracing::debug!(
            block_id = %job.block_id,
            downloaded = report.downloaded,
            skipped = report.skipped,
            "Block images saved"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use litter_core::{BlockId, Coordinates, HeadingSweep};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    fn client(server: &MockServer, sweep: HeadingSweep) -> StreetViewClient {
        StreetViewClient::new("sv-key")
            .with_base_url(server.uri())
            .with_options(ImageOptions {
                sweep,
                ..ImageOptions::default()
            })
            .with_retry(
                RetryPolicy::default()
                    .with_max_retries(1)
                    .with_min_delay(Duration::from_millis(1)),
            )
    }

    fn job() -> ImageJob {
        ImageJob::new(
            BlockId::new("4021"),
            Coordinates::new(39.95, -75.16).unwrap(),
        )
    }

    async fn mount_image(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(JPEG),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(StreetViewClient::new("k").base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_urls_carry_params() {
        let client = StreetViewClient::new("k").with_base_url("http://localhost:1/");
        let params = build_params(job().coordinates, &ImageOptions::default());
        let url = client.image_url(&params[1]).unwrap();
        assert_eq!(url.path(), "/maps/api/streetview");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("heading".to_string(), "45".to_string())));
        assert!(query.contains(&("size".to_string(), "256x256".to_string())));

        let meta = client.metadata_url(&params[1]).unwrap();
        assert_eq!(meta.path(), "/maps/api/streetview/metadata");
    }

    #[tokio::test]
    async fn test_extract_downloads_available_headings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview/metadata"))
            .and(query_param("heading", "180"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "pano_id": "p1",
                "date": "2021-06"
            })))
            .mount(&server)
            .await;
        mount_image(&server).await;

        let dir = tempfile::TempDir::new().unwrap();
        let client = client(&server, HeadingSweep::new(0, 90).unwrap());
        let report = client.extract(&job(), dir.path()).await.unwrap();

        assert_eq!(report.downloaded, 3);
        assert_eq!(report.skipped, 1);

        let folder = dir.path().join("4021");
        assert!(folder.join("gsv_0.jpg").exists());
        assert!(folder.join("gsv_1.jpg").exists());
        assert!(!folder.join("gsv_2.jpg").exists());
        assert!(folder.join("gsv_3.jpg").exists());
        assert_eq!(std::fs::read(folder.join("gsv_0.jpg")).unwrap(), JPEG);

        let metadata: Vec<Metadata> =
            serde_json::from_str(&std::fs::read_to_string(folder.join(METADATA_FILE)).unwrap())
                .unwrap();
        assert_eq!(metadata.len(), 4);
        assert_eq!(metadata[2].status, "ZERO_RESULTS");
        assert_eq!(metadata[2].heading, Some(180));
        assert_eq!(metadata[3].file.as_deref(), Some("gsv_3.jpg"));

        let links = std::fs::read_to_string(folder.join(LINKS_FILE)).unwrap();
        assert_eq!(links.lines().count(), 4);
        assert!(!links.contains("sv-key"));
    }

    #[tokio::test]
    async fn test_extract_fails_on_request_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "API key not authorized"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::TempDir::new().unwrap();
        let client = client(&server, HeadingSweep::default());
        let err = client.extract(&job(), dir.path()).await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }

    #[tokio::test]
    async fn test_failed_heading_keeps_earlier_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview/metadata"))
            .and(query_param("heading", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "pano_id": "p1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "API key not authorized"
            })))
            .mount(&server)
            .await;
        mount_image(&server).await;

        let dir = tempfile::TempDir::new().unwrap();
        let client = client(&server, HeadingSweep::new(0, 90).unwrap());
        let err = client.extract(&job(), dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));

        let folder = dir.path().join("4021");
        assert!(folder.join("gsv_0.jpg").exists());
        assert!(!folder.join("gsv_1.jpg").exists());

        let metadata: Vec<Metadata> =
            serde_json::from_str(&std::fs::read_to_string(folder.join(METADATA_FILE)).unwrap())
                .unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].file.as_deref(), Some("gsv_0.jpg"));

        let links = std::fs::read_to_string(folder.join(LINKS_FILE)).unwrap();
        assert_eq!(links.lines().count(), 2);
        assert!(!links.contains("sv-key"));
    }

    #[tokio::test]
    async fn test_fetch_image_retries_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/streetview"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_image(&server).await;

        let client = client(&server, HeadingSweep::default());
        let params = build_params(job().coordinates, client.options());
        let bytes = client.fetch_image(&params[0]).await.unwrap();
        assert_eq!(bytes, JPEG);
    }
}
