pub mod feed;
pub mod item;

pub use feed::{FeedFormat, FeedMetadata};
pub use item::FeedItem;
