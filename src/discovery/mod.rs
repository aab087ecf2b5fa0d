//! Feed discovery for arbitrary site URLs.
//!
//! Candidates are probed in priority order and the first one that answers
//! with a well-formed RSS/Atom document holding at least one entry wins:
//!
//! ```text
//! base URL itself → <link rel="alternate"> tags → conventional paths → None
//! ```
//!
//! A candidate that times out, errors or fails to parse is logged and
//! skipped; it never aborts the search.

mod html;

pub use html::alternate_feed_links;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::Result;
use crate::fetcher::{FetchResult, Fetcher};
use crate::normalizer::{FeedDocument, Normalizer};

/// Settings for the feed locator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Per-probe timeout in seconds (default: 8)
    pub probe_timeout_secs: u64,

    /// Paths tried against the site origin when no `<link>` tag validates
    pub conventional_paths: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 8,
            conventional_paths: ["/rss", "/feed", "/rss.xml", "/atom.xml", "/index.xml"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl DiscoveryConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// A discovered feed and the document that validated it.
#[derive(Debug)]
pub struct LocatedFeed {
    pub url: String,
    pub document: FeedDocument,
}

pub struct FeedLocator {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    config: DiscoveryConfig,
}

impl FeedLocator {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, config: DiscoveryConfig) -> Self {
        Self {
            fetcher,
            normalizer: Normalizer::new(),
            config,
        }
    }

    /// Find a validated feed URL for `base_url`, or `None` if no probe validates.
    ///
    /// Only an unparseable `base_url` is an error.
    pub async fn find_rss_feed(&self, base_url: &str) -> Result<Option<String>> {
        Ok(self.locate(base_url).await?.map(|found| found.url))
    }

    /// Like [`find_rss_feed`](Self::find_rss_feed) but keeps the parsed feed.
    pub async fn locate(&self, base_url: &str) -> Result<Option<LocatedFeed>> {
        let base = Url::parse(base_url)?;
        let root = self.probe(base.as_str()).await;
        Ok(self.locate_from(&base, root).await)
    }

    /// Run discovery with the root page already fetched (`None` if it failed).
    pub async fn locate_from(&self, base: &Url, root: Option<FetchResult>) -> Option<LocatedFeed> {
        let mut candidates = Vec::new();

        match root {
            Some(page) => {
                if page.looks_like_feed() {
                    if let Some(document) = self.validates(base.as_str(), &page) {
                        info!("{} is itself a feed", base);
                        return Some(LocatedFeed {
                            url: base.to_string(),
                            document,
                        });
                    }
                }

                let page_url = Url::parse(&page.final_url).unwrap_or_else(|_| base.clone());
                let html = String::from_utf8_lossy(&page.body);
                candidates.extend(alternate_feed_links(&html, &page_url));
            }
            None => debug!("Root page {} unavailable, trying conventional paths", base),
        }

        candidates.extend(
            self.config
                .conventional_paths
                .iter()
                .filter_map(|path| base.join(path).ok())
                .map(|url| url.to_string()),
        );

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| seen.insert(c.clone()));

        for candidate in candidates {
            let Some(response) = self.probe(&candidate).await else {
                continue;
            };
            if let Some(document) = self.validates(&candidate, &response) {
                info!("Discovered feed {} for {}", candidate, base);
                return Some(LocatedFeed {
                    url: candidate,
                    document,
                });
            }
        }

        debug!("No feed found for {}", base);
        None
    }

    /// Fetch one candidate under the probe timeout. Failures are logged, not returned.
    async fn probe(&self, url: &str) -> Option<FetchResult> {
        match tokio::time::timeout(self.config.probe_timeout(), self.fetcher.fetch(url)).await {
            Ok(Ok(response)) => Some(response),
            Ok(Err(e)) => {
                debug!("Probe {} failed: {}", url, e);
                None
            }
            Err(_) => {
                debug!(
                    "Probe {} timed out after {:?}",
                    url,
                    self.config.probe_timeout()
                );
                None
            }
        }
    }

    fn validates(&self, url: &str, response: &FetchResult) -> Option<FeedDocument> {
        match self.normalizer.parse(&response.body) {
            Ok(doc) if doc.entry_count() > 0 => Some(doc),
            Ok(_) => {
                debug!("Candidate {} is a feed without entries", url);
                None
            }
            Err(e) => {
                debug!("Candidate {} skipped: {}", url, e);
                None
            }
        }
    }
}
