use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{Result, ScoutError};
use crate::scraper::config::ScraperConfig;

/// A launched browser plus the task pumping its CDP connection.
struct LaunchedBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl Drop for LaunchedBrowser {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// A page borrowed from a [`BrowserSession`].
///
/// [`close`](Self::close) releases it in place. A guard dropped without being
/// closed, for example when the scrape future is cancelled, still decrements
/// the open-page count and closes the tab on a background task.
pub struct PageGuard {
    page: Page,
    open_pages: Arc<AtomicUsize>,
    released: bool,
}

impl PageGuard {
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the page and wait for the browser to acknowledge. The browser stays up.
    pub async fn close(mut self) {
        if let Err(e) = self.page.clone().close().await {
            warn!("Failed to close page: {}", e);
        }
        self.released = true;
        self.open_pages.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.open_pages.fetch_sub(1, Ordering::SeqCst);

        let page = self.page.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = page.close().await {
                        debug!("Failed to close abandoned page: {}", e);
                    }
                });
            }
            Err(_) => warn!("Page dropped outside a runtime; left for browser shutdown"),
        }
    }
}

/// Owner of the single shared headless browser.
///
/// The browser is launched on first use and reused by every later page
/// request until [`cleanup`](Self::cleanup) releases it. Concurrent first
/// callers serialize on the launch, so at most one browser process is ever
/// started per session lifetime. A failed launch leaves the session empty and
/// the next call tries again.
pub struct BrowserSession {
    config: ScraperConfig,
    state: Mutex<Option<Arc<LaunchedBrowser>>>,
    open_pages: Arc<AtomicUsize>,
    launches: AtomicUsize,
}

impl BrowserSession {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
            open_pages: Arc::new(AtomicUsize::new(0)),
            launches: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Whether a browser is currently held.
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Pages opened through this session that have not been closed yet.
    pub fn open_pages(&self) -> usize {
        self.open_pages.load(Ordering::SeqCst)
    }

    /// Number of successful browser launches so far.
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Make sure the shared browser is running, launching it if needed.
    pub async fn get_session(&self) -> Result<()> {
        self.browser().await.map(|_| ())
    }

    async fn browser(&self) -> Result<Arc<LaunchedBrowser>> {
        let mut state = self.state.lock().await;

        if let Some(launched) = state.as_ref() {
            if !launched.handler.is_finished() {
                return Ok(launched.clone());
            }
            warn!("Browser connection closed unexpectedly, relaunching");
            *state = None;
        }

        let launched = Arc::new(self.launch().await?);
        self.launches.fetch_add(1, Ordering::SeqCst);
        *state = Some(launched.clone());
        Ok(launched)
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let config = &self.config;
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .viewport(Some(Viewport {
                width: config.window_width,
                height: config.window_height,
                device_scale_factor: Some(1.0),
                ..Default::default()
            }))
            .request_timeout(config.navigation_timeout())
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--no-first-run")
            .arg("--mute-audio")
            .arg("--hide-scrollbars");

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| ScoutError::BrowserLaunch(format!("Failed to build browser config: {}", e)))
    }

    async fn launch(&self) -> Result<LaunchedBrowser> {
        let browser_config = self.browser_config()?;

        info!("Launching headless browser");
        let (browser, mut handler) =
            tokio::time::timeout(self.config.launch_timeout(), Browser::launch(browser_config))
                .await
                .map_err(|_| {
                    ScoutError::BrowserLaunch(format!(
                        "Browser did not start within {:?}",
                        self.config.launch_timeout()
                    ))
                })?
                .map_err(|e| {
                    ScoutError::BrowserLaunch(format!(
                        "{}. Is Chrome or Chromium installed and in PATH?",
                        e
                    ))
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(LaunchedBrowser { browser, handler })
    }

    /// Open a fresh blank page on the shared browser, launching it if needed.
    pub async fn new_page(&self) -> Result<PageGuard> {
        let launched = self.browser().await?;

        let page = tokio::time::timeout(
            self.config.navigation_timeout(),
            launched.browser.new_page("about:blank"),
        )
        .await
        .map_err(|_| ScoutError::navigation("about:blank", "timed out creating page"))?
        .map_err(|e| ScoutError::navigation("about:blank", format!("failed to create page: {}", e)))?;

        self.open_pages.fetch_add(1, Ordering::SeqCst);
        Ok(PageGuard {
            page,
            open_pages: self.open_pages.clone(),
            released: false,
        })
    }

    /// Close the shared browser and forget it. A later request relaunches.
    ///
    /// No-op when no browser is running. Callers are expected to let
    /// outstanding scrapes settle first; a browser still borrowed by a scrape
    /// is detached and shuts down when its last user drops it.
    pub async fn cleanup(&self) {
        let Some(launched) = self.state.lock().await.take() else {
            debug!("No browser session to clean up");
            return;
        };

        match Arc::try_unwrap(launched) {
            Ok(mut launched) => {
                if let Err(e) = launched.browser.close().await {
                    warn!("Failed to close browser: {}", e);
                }
                if let Err(e) = launched.browser.wait().await {
                    warn!("Failed to wait for browser exit: {}", e);
                }
                info!("Browser session closed");
            }
            Err(shared) => {
                warn!(
                    "Browser still borrowed by {} scrape(s); detaching session",
                    Arc::strong_count(&shared) - 1
                );
            }
        }
    }
}
