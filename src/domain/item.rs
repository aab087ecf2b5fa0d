use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl FeedItem {
    pub fn new(feed_url: &str, entry_key: &str) -> Self {
        Self {
            id: Self::generate_id(feed_url, entry_key),
            title: String::new(),
            link: String::new(),
            published_at: None,
        }
    }

    /// Generate a deterministic ID from feed URL and the entry's guid (or link)
    pub fn generate_id(feed_url: &str, entry_key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(feed_url.as_bytes());
        hasher.update(entry_key.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
