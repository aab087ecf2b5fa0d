//! Representative-image lookup that always produces a URL.
//!
//! Strategies run cheapest first and stop at the first usable answer:
//!
//! ```text
//! feed <image>/<logo>/<icon>  →  rendered page og:image / largest <img>  →  default
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::metadata::FeedReader;
use crate::scraper::{Extraction, Scraper};

/// Selector matching every element the in-page picker may choose from.
pub const IMAGE_SELECTOR: &str = r#"meta[property="og:image"], meta[name="twitter:image"], img"#;

const IMAGE_PICKER: &str = r#"(els) => {
    const abs = (u) => {
        if (!u || u.trim().startsWith('data:')) return null;
        try { return new URL(u.trim(), document.baseURI).href; } catch (e) { return null; }
    };
    for (const key of ['og:image', 'twitter:image']) {
        const meta = els.find(el => el.tagName === 'META'
            && (el.getAttribute('property') === key || el.getAttribute('name') === key));
        const url = meta && abs(meta.getAttribute('content'));
        if (url) return url;
    }
    const imgs = els.filter(el => el.tagName === 'IMG' && abs(el.currentSrc || el.getAttribute('src')));
    if (imgs.length === 0) return null;
    const area = (img) => (img.naturalWidth || img.width || 0) * (img.naturalHeight || img.height || 0);
    const best = imgs.reduce((a, b) => area(b) > area(a) ? b : a, imgs[0]);
    return abs(best.currentSrc || best.getAttribute('src'));
}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Returned when neither the feed nor the page yields an image
    pub default_image_url: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_image_url: "https://via.placeholder.com/300x200?text=No+Image".to_string(),
        }
    }
}

pub struct ImageResolver {
    reader: Arc<FeedReader>,
    scraper: Arc<dyn Scraper>,
    default_image_url: String,
}

impl ImageResolver {
    pub fn new(reader: Arc<FeedReader>, scraper: Arc<dyn Scraper>, config: &ImageConfig) -> Self {
        Self {
            reader,
            scraper,
            default_image_url: config.default_image_url.clone(),
        }
    }

    /// Best image URL for `url`. Never fails; every error falls through to the next strategy.
    pub async fn get_image_from_rss_or_default(&self, url: &str) -> String {
        match self.reader.get_rss_metadata(url).await {
            Ok(meta) => {
                if let Some(image) = meta.image_url.filter(|u| !u.trim().is_empty()) {
                    debug!("Using feed image for {}", url);
                    return image;
                }
                debug!("Feed for {} declares no image", url);
            }
            Err(e) => debug!("No feed metadata for {}: {}", url, e),
        }

        let extraction = Extraction::script(IMAGE_PICKER);
        match self
            .scraper
            .scrape_articles(url, IMAGE_SELECTOR, &extraction)
            .await
        {
            Ok(serde_json::Value::String(image)) if !image.trim().is_empty() => {
                debug!("Using page image for {}", url);
                return image;
            }
            Ok(_) => debug!("Page {} has no usable image", url),
            Err(e) => warn!("Image scrape of {} failed: {}", url, e),
        }

        self.default_image_url.clone()
    }
}
