use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the shared browser and the article scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Keep Chrome's process sandbox enabled (default: true)
    pub sandbox: bool,

    /// Explicit Chrome/Chromium binary; autodetected when unset
    pub executable: Option<PathBuf>,

    /// Fixed window and viewport size so pages render the same way every run
    pub window_width: u32,
    pub window_height: u32,

    /// Browser launch timeout in seconds (default: 20)
    pub launch_timeout_secs: u64,

    /// Page navigation timeout in seconds (default: 30)
    pub navigation_timeout_secs: u64,

    /// How long to wait for the target selector in seconds (default: 10)
    pub selector_timeout_secs: u64,

    /// Interval between selector checks in milliseconds (default: 200)
    pub poll_interval_ms: u64,

    /// Maximum concurrent browser pages (default: 5)
    pub max_concurrency: usize,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            executable: None,
            window_width: 1280,
            window_height: 800,
            launch_timeout_secs: 20,
            navigation_timeout_secs: 30,
            selector_timeout_secs: 10,
            poll_interval_ms: 200,
            max_concurrency: 5,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl ScraperConfig {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}
