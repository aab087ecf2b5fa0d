use chrono::Utc;
use feed_rs::model::{Feed, FeedType};
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, ScoutError};
use crate::domain::{FeedFormat, FeedItem, FeedMetadata};

/// A parsed feed tagged with the syndication format it came from.
///
/// RSS and Atom differ structurally; everything past this point works on the
/// single [`FeedMetadata`] shape produced by [`FeedDocument::into_metadata`].
#[derive(Debug)]
pub enum FeedDocument {
    Rss(Feed),
    Atom(Feed),
}

impl FeedDocument {
    pub fn format(&self) -> FeedFormat {
        match self {
            FeedDocument::Rss(_) => FeedFormat::Rss,
            FeedDocument::Atom(_) => FeedFormat::Atom,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.feed().entries.len()
    }

    fn feed(&self) -> &Feed {
        match self {
            FeedDocument::Rss(feed) | FeedDocument::Atom(feed) => feed,
        }
    }

    pub fn into_metadata(self, feed_url: &str) -> FeedMetadata {
        let format = self.format();
        let feed = match self {
            FeedDocument::Rss(feed) | FeedDocument::Atom(feed) => feed,
        };

        // RSS <image> and Atom <logo> both land in `logo`; Atom <icon> is the fallback.
        let image_url = feed
            .logo
            .as_ref()
            .or(feed.icon.as_ref())
            .map(|image| image.uri.trim().to_string())
            .filter(|uri| !uri.is_empty());

        let site_url = feed
            .links
            .iter()
            .map(|link| link.href.trim())
            .find(|href| !href.is_empty() && *href != feed_url)
            .map(String::from);

        let items = feed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.trim().to_string())
                    .unwrap_or_default();
                let title = entry
                    .title
                    .map(|t| clean_text(&t.content))
                    .unwrap_or_default();

                let entry_key = if !entry.id.is_empty() {
                    entry.id.as_str()
                } else if !link.is_empty() {
                    link.as_str()
                } else {
                    title.as_str()
                };

                let mut item = FeedItem::new(feed_url, entry_key);
                item.published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc));
                item.title = title;
                item.link = link;
                item
            })
            .collect();

        FeedMetadata {
            title: feed
                .title
                .map(|t| clean_text(&t.content))
                .unwrap_or_default(),
            description: feed
                .description
                .map(|d| clean_text(&d.content))
                .filter(|d| !d.is_empty()),
            image_url,
            items,
            source_url: feed_url.to_string(),
            site_url,
            format,
        }
    }
}

#[derive(Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw bytes as an RSS or Atom document.
    pub fn parse(&self, body: &[u8]) -> Result<FeedDocument> {
        let feed = parser::parse(body).map_err(|e| ScoutError::FeedParse(e.to_string()))?;

        match feed.feed_type {
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => Ok(FeedDocument::Rss(feed)),
            FeedType::Atom => Ok(FeedDocument::Atom(feed)),
            FeedType::JSON => Err(ScoutError::FeedParse(
                "JSON Feed documents are not RSS or Atom".into(),
            )),
        }
    }

    pub fn normalize(&self, feed_url: &str, body: &[u8]) -> Result<FeedMetadata> {
        Ok(self.parse(body)?.into_metadata(feed_url))
    }
}

/// Decode HTML entities, drop control characters and trim.
fn clean_text(raw: &str) -> String {
    decode_html_entities(raw)
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}
