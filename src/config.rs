//! Runtime configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then the `GEOPIXEL_API_URL` environment variable, then command-line
//! flags (applied by the caller).

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::raster::DEFAULT_MAX_FILE_SIZE;

/// Environment variable holding the extraction service base URL
pub const API_URL_ENV: &str = "GEOPIXEL_API_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io { path: PathBuf, source: io::Error },
    /// The configuration file is not valid TOML for this structure
    Parse(String),
    /// A value is out of range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "Cannot read config {}: {}", path.display(), source),
            ConfigError::Parse(msg) => write!(f, "Invalid config file: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolved settings for the decoder and extraction client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoPixelConfig {
    /// Base URL of the extraction service
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Token budget sent with every request, if any
    pub max_tokens: Option<u32>,
    /// Largest accepted upload in bytes
    pub max_file_size: u64,
}

impl Default for GeoPixelConfig {
    fn default() -> Self {
        GeoPixelConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl GeoPixelConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Defaults, then `file` if given, then the environment
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment variables found through `lookup`
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            debug!("Using endpoint from {}", API_URL_ENV);
            self.endpoint = url.trim().to_string();
        }
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!("endpoint {:?} is not an http(s) URL", self.endpoint)));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be positive".to_string()));
        }
        if self.max_tokens == Some(0) {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid("max_file_size must be positive".to_string()));
        }
        Ok(())
    }
}
