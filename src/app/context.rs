use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::discovery::FeedLocator;
use crate::domain::FeedMetadata;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::images::ImageResolver;
use crate::metadata::FeedReader;
use crate::scraper::{BrowserSession, ChromeScraper, Extraction, Scraper};

/// Wires the components together and exposes the caller-facing operations.
///
/// Owns the shared [`BrowserSession`]; call [`cleanup`](Self::cleanup) before
/// the host process exits.
pub struct AppContext {
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub locator: Arc<FeedLocator>,
    pub reader: Arc<FeedReader>,
    pub session: Arc<BrowserSession>,
    pub scraper: Arc<ChromeScraper>,
    pub images: ImageResolver,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.http)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let locator = Arc::new(FeedLocator::new(fetcher.clone(), config.discovery));
        let reader = Arc::new(FeedReader::new(fetcher.clone(), locator.clone()));
        let session = Arc::new(BrowserSession::new(config.scraper));
        let scraper = Arc::new(ChromeScraper::new(session.clone()));
        let images = ImageResolver::new(reader.clone(), scraper.clone(), &config.images);

        Self {
            fetcher,
            locator,
            reader,
            session,
            scraper,
            images,
        }
    }

    pub async fn find_rss_feed(&self, url: &str) -> Result<Option<String>> {
        self.locator.find_rss_feed(url).await
    }

    pub async fn get_rss_metadata(&self, url: &str) -> Result<FeedMetadata> {
        self.reader.get_rss_metadata(url).await
    }

    pub async fn get_image_from_rss_or_default(&self, url: &str) -> String {
        self.images.get_image_from_rss_or_default(url).await
    }

    pub async fn scrape_articles(
        &self,
        url: &str,
        selector: &str,
        extraction: &Extraction,
    ) -> Result<serde_json::Value> {
        self.scraper.scrape_articles(url, selector, extraction).await
    }

    pub async fn cleanup(&self) {
        self.session.cleanup().await;
    }
}
