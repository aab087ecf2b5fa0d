use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

use crate::app::{Result, ScoutError};
use crate::scraper::config::ScraperConfig;
use crate::scraper::extractor::{presence_script, Extraction, Presence, NAVIGATION_STATUS_SCRIPT};
use crate::scraper::session::BrowserSession;
use crate::scraper::Scraper;

/// Chrome-based scraper borrowing pages from a shared [`BrowserSession`]
pub struct ChromeScraper {
    session: Arc<BrowserSession>,
    config: ScraperConfig,
    semaphore: Arc<Semaphore>,
}

impl ChromeScraper {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        let config = session.config().clone();
        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));

        Self {
            session,
            config,
            semaphore,
        }
    }

    /// Like [`Scraper::scrape_articles`] but deserializes the result into `T`.
    pub async fn scrape<T: DeserializeOwned>(
        &self,
        url: &str,
        selector: &str,
        extraction: &Extraction,
    ) -> Result<T> {
        let value = self.scrape_articles(url, selector, extraction).await?;
        serde_json::from_value(value)
            .map_err(|e| ScoutError::Extraction(format!("Unexpected result shape: {}", e)))
    }

    /// Navigate, wait for the selector, then extract. Strictly in that order.
    async fn scrape_page(
        &self,
        page: &Page,
        url: &str,
        selector: &str,
        extraction: &Extraction,
    ) -> Result<serde_json::Value> {
        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| ScoutError::navigation(url, format!("failed to set user agent: {}", e)))?;
        }

        tokio::time::timeout(self.config.navigation_timeout(), page.goto(url))
            .await
            .map_err(|_| {
                ScoutError::navigation(
                    url,
                    format!("timed out after {:?}", self.config.navigation_timeout()),
                )
            })?
            .map_err(|e| ScoutError::navigation(url, e))?;

        self.check_status(page, url, selector).await?;
        self.wait_for_selector(page, url, selector).await?;

        let script = extraction.evaluation_script(selector);
        let json: String = page
            .evaluate(script)
            .await
            .map_err(|e| ScoutError::Extraction(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| ScoutError::Extraction(format!("Failed to read result: {:?}", e)))?;

        serde_json::from_str(&json)
            .map_err(|e| ScoutError::Extraction(format!("Result is not valid JSON: {}", e)))
    }

    /// Reject a non-2xx main document unless it already shows the selector.
    async fn check_status(&self, page: &Page, url: &str, selector: &str) -> Result<()> {
        let status = match page.evaluate(NAVIGATION_STATUS_SCRIPT.to_string()).await {
            Ok(value) => value.into_value::<u16>().unwrap_or(0),
            Err(e) => {
                debug!("Could not read response status for {}: {}", url, e);
                0
            }
        };

        // 0 means the browser did not report a status
        if status == 0 || (200..300).contains(&status) {
            return Ok(());
        }

        if self.presence(page, url, &presence_script(selector)).await == Some(Presence::Found) {
            debug!("{} answered HTTP {} but has matching content", url, status);
            return Ok(());
        }

        Err(ScoutError::navigation(url, format!("HTTP {}", status)))
    }

    async fn wait_for_selector(&self, page: &Page, url: &str, selector: &str) -> Result<()> {
        let script = presence_script(selector);
        let poll = async {
            loop {
                match self.presence(page, url, &script).await {
                    Some(Presence::Found) => return Ok::<(), ScoutError>(()),
                    Some(Presence::Invalid(reason)) => {
                        return Err(ScoutError::Extraction(format!(
                            "Invalid selector '{}': {}",
                            selector, reason
                        )));
                    }
                    Some(Presence::Missing) | None => {}
                }
                tokio::time::sleep(self.config.poll_interval()).await;
            }
        };

        tokio::time::timeout(self.config.selector_timeout(), poll)
            .await
            .map_err(|_| ScoutError::SelectorTimeout {
                url: url.to_string(),
                selector: selector.to_string(),
                timeout: self.config.selector_timeout(),
            })?
    }

    /// One presence check. `None` when the evaluation itself failed, which
    /// happens while a client-side redirect tears down the execution context.
    async fn presence(&self, page: &Page, url: &str, script: &str) -> Option<Presence> {
        match page.evaluate(script.to_string()).await {
            Ok(value) => value
                .into_value::<String>()
                .ok()
                .map(|report| Presence::from_report(&report)),
            Err(e) => {
                debug!("Presence check on {} failed, retrying: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl Scraper for ChromeScraper {
    async fn scrape_articles(
        &self,
        url: &str,
        selector: &str,
        extraction: &Extraction,
    ) -> Result<serde_json::Value> {
        Url::parse(url)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ScoutError::Extraction(format!("Semaphore error: {}", e)))?;

        // Dropping the guard closes the tab too, if this future is cancelled.
        let page = self.session.new_page().await?;
        debug!("Scraping {} for '{}'", url, selector);

        let result = self.scrape_page(page.page(), url, selector, extraction).await;
        page.close().await;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_opens_no_page() {
        let session = Arc::new(BrowserSession::new(ScraperConfig::default()));
        let scraper = ChromeScraper::new(session.clone());

        let result = scraper
            .scrape_articles("not a url", "a", &Extraction::text())
            .await;

        assert!(matches!(result, Err(ScoutError::InvalidUrl(_))));
        assert_eq!(session.open_pages(), 0);
        assert!(!session.is_active().await);
    }

    #[tokio::test]
    async fn test_launch_failure_surfaces_and_leaves_no_pages() {
        let session = Arc::new(BrowserSession::new(ScraperConfig {
            executable: Some("/nonexistent/feedscout/chrome".into()),
            ..Default::default()
        }));
        let scraper = ChromeScraper::new(session.clone());

        let result = scraper
            .scrape_articles("https://example.com", "a", &Extraction::text())
            .await;

        assert!(matches!(result, Err(ScoutError::BrowserLaunch(_))));
        assert_eq!(session.open_pages(), 0);
    }
}
