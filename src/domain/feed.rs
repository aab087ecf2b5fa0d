use serde::{Deserialize, Serialize};

use crate::domain::FeedItem;

/// Syndication format a feed document was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    Rss,
    Atom,
}

/// Normalized channel-level metadata plus the entries of a feed.
///
/// Optional fields serialize as `null` rather than being skipped so callers
/// always see the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMetadata {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Entries in document order.
    pub items: Vec<FeedItem>,
    /// The feed URL the document was read from.
    pub source_url: String,
    pub site_url: Option<String>,
    pub format: FeedFormat,
}

impl FeedMetadata {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.source_url
        } else {
            &self.title
        }
    }
}
