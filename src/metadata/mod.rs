use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::app::{Result, ScoutError};
use crate::discovery::FeedLocator;
use crate::domain::FeedMetadata;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

/// Reads [`FeedMetadata`] from either a feed URL or a site URL.
pub struct FeedReader {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    locator: Arc<FeedLocator>,
    normalizer: Normalizer,
}

impl FeedReader {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, locator: Arc<FeedLocator>) -> Self {
        Self {
            fetcher,
            locator,
            normalizer: Normalizer::new(),
        }
    }

    /// Fetch and normalize the feed behind `url`.
    ///
    /// A response that looks like a feed is parsed directly and a parse
    /// failure is fatal. Anything else, including a root page that cannot be
    /// fetched at all, goes through the locator. The root response and the
    /// located document are each fetched once.
    ///
    /// # Errors
    ///
    /// [`ScoutError::FeedNotFound`] when the locator finds nothing,
    /// [`ScoutError::FeedParse`] when a feed-looking response is not RSS/Atom,
    /// and [`ScoutError::InvalidUrl`] when `url` does not parse.
    pub async fn get_rss_metadata(&self, url: &str) -> Result<FeedMetadata> {
        let base = Url::parse(url)?;

        let root = match self.fetcher.fetch(url).await {
            Ok(response) if response.looks_like_feed() => {
                debug!("{} answered with feed content, skipping discovery", url);
                return self.normalizer.normalize(url, &response.body);
            }
            Ok(response) => Some(response),
            Err(e) => {
                debug!("Fetching {} failed ({}), trying conventional paths", url, e);
                None
            }
        };

        let found = self
            .locator
            .locate_from(&base, root)
            .await
            .ok_or_else(|| ScoutError::FeedNotFound(url.to_string()))?;

        Ok(found.document.into_metadata(&found.url))
    }
}
