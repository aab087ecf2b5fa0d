pub mod http_fetcher;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// A successful (2xx) response body.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// URL after redirects
    pub final_url: String,
    /// Lowercased `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResult {
    /// Whether the response is declared as (or sniffs like) an XML feed.
    pub fn looks_like_feed(&self) -> bool {
        if let Some(ct) = self.content_type.as_deref() {
            if ct.contains("application/rss+xml")
                || ct.contains("application/atom+xml")
                || ct.contains("application/xml")
                || ct.contains("text/xml")
            {
                return true;
            }
        }

        let head = String::from_utf8_lossy(&self.body[..self.body.len().min(512)]);
        let head = head.trim_start_matches('\u{feff}').trim_start();
        ["<?xml", "<rss", "<feed", "<rdf:RDF"]
            .iter()
            .any(|prefix| head.starts_with(prefix))
    }
}

#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult>;
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Maximum accepted response body in bytes (default: 5 MiB)
    pub max_body_bytes: usize,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_body_bytes: 5 * 1024 * 1024,
            user_agent: format!("feedscout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(content_type: Option<&str>, body: &str) -> FetchResult {
        FetchResult {
            final_url: "https://example.com/".into(),
            content_type: content_type.map(String::from),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_looks_like_feed_by_content_type() {
        assert!(result(Some("application/rss+xml; charset=utf-8"), "").looks_like_feed());
        assert!(result(Some("text/xml"), "").looks_like_feed());
        assert!(!result(Some("text/html"), "<html></html>").looks_like_feed());
    }

    #[test]
    fn test_looks_like_feed_by_sniffing() {
        assert!(result(None, "\n  <rss><channel></channel></rss>").looks_like_feed());
        assert!(result(None, "\u{feff}<?xml version=\"1.0\"?><feed/>").looks_like_feed());
        assert!(!result(None, "<!DOCTYPE html><html></html>").looks_like_feed());
    }

    #[test]
    fn test_default_http_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_body_bytes, 5 * 1024 * 1024);
        assert!(config.user_agent.starts_with("feedscout/"));
    }
}
