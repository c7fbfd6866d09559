//! `litterview` configuration file.
//!
//! One TOML file with three sections:
//!
//! ```toml
//! [google]
//! api_key = "..."
//!
//! [imagery]
//! width = 256
//! height = 256
//!
//! [pipeline]
//! limit = 10
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use litter_core::{HeadingSweep, RetryPolicy};
use litter_pipeline::PipelineConfig;
use litter_streetview::{ImageOptions, ImageSize};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LITTERVIEW_CONFIG";

/// Environment variable holding the Google API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "litterview.toml";

/// Prefix of exported environment variables.
pub const ENV_PREFIX: &str = "LITTERVIEW";

/// Shown in place of secrets.
pub const REDACTED: &str = "***";

/// Google Maps Platform access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// API key; `GOOGLE_API_KEY` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Maps API host.
    pub base_url: String,
    /// Retries after the first attempt of each request.
    pub max_retries: usize,
    /// First backoff delay in milliseconds.
    pub retry_min_delay_ms: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            api_key: None,
            base_url: litter_core::DEFAULT_BASE_URL.to_string(),
            max_retries: retry.max_retries,
            retry_min_delay_ms: u64::try_from(retry.min_delay.as_millis()).unwrap_or(500),
        }
    }
}

impl GoogleConfig {
    /// The API key, from `GOOGLE_API_KEY` or the config file.
    pub fn api_key(&self) -> Result<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    /// Retry policy for both Google clients.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(self.max_retries)
            .with_min_delay(Duration::from_millis(self.retry_min_delay_ms))
    }
}

/// Picks the API key: environment first, then config. Blank values count as
/// unset.
pub fn resolve_api_key(from_env: Option<String>, from_config: Option<&str>) -> Result<String> {
    from_env
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .or_else(|| {
            from_config
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
        })
        .ok_or_else(|| {
            Error::config(format!(
                "no Google API key: set {API_KEY_ENV} or [google].api_key in the config file"
            ))
        })
}

/// Street View image settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageryConfig {
    /// Image width in pixels.
    pub width: u16,
    /// Image height in pixels.
    pub height: u16,
    /// Camera pitch in degrees.
    pub pitch: i8,
    /// Horizontal field of view in degrees.
    pub fov: u8,
    /// First heading of the sweep.
    pub heading_start: u16,
    /// Degrees between headings.
    pub heading_step: u16,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        let options = ImageOptions::default();
        Self {
            width: options.size.width,
            height: options.size.height,
            pitch: options.pitch,
            fov: options.fov,
            heading_start: options.sweep.start,
            heading_step: options.sweep.step,
        }
    }
}

impl ImageryConfig {
    /// Validated request options.
    pub fn options(&self) -> litter_core::Result<ImageOptions> {
        let options = ImageOptions {
            size: ImageSize::new(self.width, self.height)?,
            pitch: self.pitch,
            fov: self.fov,
            sweep: HeadingSweep::new(self.heading_start, self.heading_step)?,
        };
        options.validate()?;
        Ok(options)
    }
}

/// The whole `litterview` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LitterviewConfig {
    /// Google API access.
    pub google: GoogleConfig,
    /// Street View image settings.
    pub imagery: ImageryConfig,
    /// Input, output and concurrency settings.
    pub pipeline: PipelineConfig,
}

impl LitterviewConfig {
    /// Name used in user-facing messages.
    pub fn project_name() -> &'static str {
        "litterview"
    }

    /// `<config dir>/litterview/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// A path the user asked for: `--config`, else `LITTERVIEW_CONFIG`.
    pub fn explicit_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    /// The config file in effect: explicit path, then `./litterview.toml`,
    /// then the per-user default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = Self::explicit_config_path(explicit) {
            return Some(path);
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        Self::default_config_path()
    }

    /// Loads the config in effect.
    ///
    /// An explicitly named file must exist. Otherwise a missing file means
    /// defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let named = Self::explicit_config_path(explicit);
        let Some(path) = named.clone().or_else(|| Self::resolve_config_path(None)) else {
            return Ok(Self::default());
        };

        if path.is_file() {
            tracing::debug!(path = %path.display(), "Loading config");
            return Self::from_file(&path);
        }
        if named.is_some() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Renders the config as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `LITTERVIEW_<SECTION>_<KEY>` pairs for every set value, secrets
    /// redacted.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self)?;
        let mut vars = Vec::new();
        let Some(sections) = value.as_table() else {
            return Ok(vars);
        };
        for (section, body) in sections {
            let Some(fields) = body.as_table() else {
                continue;
            };
            for (key, field) in fields {
                let name = format!(
                    "{ENV_PREFIX}_{}_{}",
                    section.to_uppercase(),
                    key.to_uppercase()
                );
                let rendered = if key == "api_key" {
                    REDACTED.to_string()
                } else {
                    crate::config_handlers::format_toml_value(field)
                };
                vars.push((name, rendered));
            }
        }
        Ok(vars)
    }
}
