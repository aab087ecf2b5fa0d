use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    /// The page could not be loaded (timeout, DNS failure, protocol error).
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The page loaded but the expected content never appeared.
    #[error("Selector '{selector}' did not appear on {url} within {timeout:?}")]
    SelectorTimeout {
        url: String,
        selector: String,
        timeout: Duration,
    },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("No feed found for {0}")]
    FeedNotFound(String),

    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Response from {url} exceeded the size limit")]
    TooLarge { url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScoutError {
    pub(crate) fn navigation(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
