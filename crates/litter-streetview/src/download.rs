//! Download bookkeeping: reports, metadata and link files.

use std::path::{Path, PathBuf};

use litter_core::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// Metadata file written into every block folder.
pub const METADATA_FILE: &str = "metadata.json";

/// Link file written into every block folder.
pub const LINKS_FILE: &str = "links.txt";

const REDACTED: &str = "REDACTED";

/// What one block's extraction produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReport {
    /// Images written to disk.
    pub downloaded: usize,
    /// Headings with no imagery available.
    pub skipped: usize,
    /// Paths of the written images.
    pub files: Vec<PathBuf>,
}

/// Image file name for the heading at `index` of the sweep.
pub fn image_file_name(index: usize) -> String {
    format!("gsv_{index}.jpg")
}

/// Replaces the value of the `key` query parameter.
pub fn redact_key(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "key" {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}

/// Writes one redacted link per line.
pub async fn save_links(links: &[Url], path: &Path) -> Result<()> {
    let mut content = String::new();
    for link in links {
        content.push_str(&redact_key(link));
        content.push('\n');
    }
    tokio::fs::write(path, content).await.map_err(|e| {
        Error::image_fetch_with_source(format!("failed to write {}", path.display()), e)
    })
}

/// Writes the per-heading metadata entries as pretty JSON.
pub async fn write_metadata(entries: &[Metadata], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    tokio::fs::write(path, json).await.map_err(|e| {
        Error::image_fetch_with_source(format!("failed to write {}", path.display()), e)
    })
}
