//! # feedscout
//!
//! Feed discovery, metadata extraction and headless scraping for arbitrary
//! site URLs.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → FeedLocator → FeedReader (Normalizer) ─┐
//!                                                  ├→ ImageResolver
//! BrowserSession → ChromeScraper ──────────────────┘
//! ```
//!
//! - [`fetcher`]: bounded HTTP GET with timeout and body cap
//! - [`discovery`]: prioritized feed probing
//! - [`normalizer`]: RSS/Atom into a single metadata shape
//! - [`metadata`]: feed-or-site URL to [`FeedMetadata`](domain::FeedMetadata)
//! - [`scraper`]: shared headless browser and per-call pages
//! - [`images`]: feed image, then page image, then a default
//!
//! ## Quick Start
//!
//! ```bash
//! feedscout find https://blog.rust-lang.org
//! feedscout meta https://blog.rust-lang.org --json
//! feedscout image https://example.com
//! feedscout scrape https://news.ycombinator.com .athing --script 'els => els.map(el => el.id)'
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires fetcher, locator, reader, browser
/// session, scraper and image resolver together.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/feedscout/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`FeedMetadata`](domain::FeedMetadata): normalized channel data plus items
/// - [`FeedItem`](domain::FeedItem): one entry with a stable SHA-256 id
pub mod domain;

/// Feed discovery via `<link rel="alternate">` tags and conventional paths.
pub mod discovery;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for GET requests
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Representative image resolution with a guaranteed fallback.
pub mod images;

/// Feed metadata reading, with discovery when handed a site URL.
pub mod metadata;

/// Feed parsing and normalization.
///
/// Parses RSS 0.9x/1.0/2.0 and Atom into a tagged
/// [`FeedDocument`](normalizer::FeedDocument), then into
/// [`FeedMetadata`](domain::FeedMetadata).
pub mod normalizer;

/// Headless Chrome scraping via chromiumoxide.
///
/// - [`BrowserSession`](scraper::BrowserSession): the one shared browser
/// - [`ChromeScraper`](scraper::ChromeScraper): page-per-call scraper
/// - [`Extraction`](scraper::Extraction): what to pull out of matched elements
pub mod scraper;
