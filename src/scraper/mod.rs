//! Headless-browser scraping for pages without a usable feed.
//!
//! # Architecture
//!
//! ```text
//! BrowserSession (one shared browser) → ChromeScraper (one page per call) → JSON
//! ```
//!
//! Each scrape opens its own page, navigates, waits for the selector,
//! evaluates an [`Extraction`] inside the page and closes the page again.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use feedscout::scraper::{BrowserSession, ChromeScraper, Extraction, ScraperConfig};
//!
//! let session = Arc::new(BrowserSession::new(ScraperConfig::default()));
//! let scraper = ChromeScraper::new(session.clone());
//!
//! let ids: Vec<String> = scraper
//!     .scrape(
//!         "https://news.ycombinator.com",
//!         ".athing",
//!         &Extraction::script("els => els.map(el => el.id)"),
//!     )
//!     .await?;
//!
//! session.cleanup().await;
//! ```

mod chrome;
mod config;
mod extractor;
mod session;

pub use chrome::ChromeScraper;
pub use config::ScraperConfig;
pub use extractor::{Extraction, FieldSource};
pub use session::{BrowserSession, PageGuard};

use crate::app::Result;
use async_trait::async_trait;

/// Trait for page scraping implementations
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Load `url`, wait for `selector` and return the extraction's JSON result.
    ///
    /// # Errors
    ///
    /// [`Navigation`](crate::app::ScoutError::Navigation) when the page does
    /// not load, [`SelectorTimeout`](crate::app::ScoutError::SelectorTimeout)
    /// when it loads but the selector never matches.
    async fn scrape_articles(
        &self,
        url: &str,
        selector: &str,
        extraction: &Extraction,
    ) -> Result<serde_json::Value>;
}
