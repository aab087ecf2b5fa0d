//! Configuration management for feedscout.
//!
//! Configuration is read from `~/.config/feedscout/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::discovery::DiscoveryConfig;
use crate::fetcher::HttpConfig;
use crate::images::ImageConfig;
use crate::scraper::ScraperConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub discovery: DiscoveryConfig,
    pub scraper: ScraperConfig,
    pub images: ImageConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/feedscout/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedscout").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# feedscout configuration
#
# Every key is optional; anything left out keeps its built-in default.

[http]
# Whole-request timeout in seconds
timeout_secs = 10

# Largest response body accepted, in bytes
max_body_bytes = 5242880

# user_agent = "feedscout/0.1.0"

[discovery]
# Timeout for each individual feed probe, in seconds
probe_timeout_secs = 8

# Paths tried on the site origin when the page advertises no feed
conventional_paths = ["/rss", "/feed", "/rss.xml", "/atom.xml", "/index.xml"]

[scraper]
# Run browser in headless mode (no visible window)
headless = true

# Keep Chrome's sandbox on; disable only inside containers that forbid it
sandbox = true

# executable = "/usr/bin/chromium"

window_width = 1280
window_height = 800

launch_timeout_secs = 20
navigation_timeout_secs = 30
selector_timeout_secs = 10
poll_interval_ms = 200

# Maximum concurrent browser pages
max_concurrency = 5

[images]
# Returned when neither the feed nor the page provides an image
default_image_url = "https://via.placeholder.com/300x200?text=No+Image"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl From<ConfigError> for crate::app::ScoutError {
    fn from(err: ConfigError) -> Self {
        crate::app::ScoutError::Config(err.to_string())
    }
}
