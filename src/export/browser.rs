//! Browser session management
//!
//! One headless Chromium session serves both pipeline hand-offs that need a
//! live rendering surface: capturing the conversation page and printing the
//! assembled document. The session owns its profile directory (removed with
//! the session) and the CDP event-handler task.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::{self, JoinHandle};

use crate::error::{ExportError, ExportResult};
use crate::utils::constants::CHROME_USER_AGENT;

/// Find a Chrome/Chromium executable on the system.
///
/// The `CHROMIUM_PATH` environment variable overrides all other methods.
fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            log::info!(
                "Using browser from CHROMIUM_PATH environment variable: {}",
                path.display()
            );
            return Ok(path);
        }
        log::warn!(
            "CHROMIUM_PATH environment variable points to non-existent file: {}",
            path.display()
        );
    }

    let paths = if cfg!(target_os = "macos") {
        vec![
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        // Linux
        vec![
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    };

    for candidate in paths {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(path);
        }
    }

    anyhow::bail!(
        "No Chrome/Chromium executable found; set CHROMIUM_PATH to the browser binary"
    )
}

/// A launched browser plus the task draining its CDP event stream.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    _profile_dir: tempfile::TempDir,
}

impl BrowserSession {
    /// Launch the rendering surface.
    ///
    /// # Errors
    ///
    /// `CapabilityUnavailable`: no executable found, or the browser failed
    /// to start. This is the last of the pipeline's ordered capability
    /// acquisition steps.
    pub async fn launch(headless: bool) -> ExportResult<Self> {
        let chrome_path = find_browser_executable()
            .map_err(|e| ExportError::capability("document-renderer", format!("{e:#}")))?;

        let profile_dir = tempfile::Builder::new()
            .prefix("convoprint_chrome_")
            .tempdir()
            .map_err(|e| ExportError::capability("document-renderer", e))?;

        let mut config_builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .window_size(1920, 1080)
            .user_data_dir(profile_dir.path().to_path_buf())
            .chrome_executable(chrome_path);

        if headless {
            config_builder = config_builder.headless_mode(HeadlessMode::default());
        } else {
            config_builder = config_builder.with_head();
        }

        config_builder = config_builder
            .arg(format!("--user-agent={CHROME_USER_AGENT}"))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-notifications")
            .arg("--disable-print-preview")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-background-networking");

        let browser_config = config_builder
            .build()
            .map_err(|e| ExportError::capability("document-renderer", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ExportError::capability("document-renderer", e))?;

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        log::debug!("Browser session launched (headless: {headless})");
        Ok(Self {
            browser,
            handler_task,
            _profile_dir: profile_dir,
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser and stop the handler task.
    ///
    /// Runs on every pipeline exit path, success or failure. Errors here are
    /// logged, not propagated: they must not mask the pipeline's own result.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            log::warn!("Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            log::warn!("Failed to wait for browser exit: {e}");
        }
        self.handler_task.abort();
        log::debug!("Browser session closed");
    }
}

/// Run a page operation with a timeout.
///
/// Prevents hangs on slow DNS, unresponsive servers, or streaming content.
pub async fn with_page_timeout<T>(
    operation: impl std::future::Future<Output = Result<T>>,
    timeout_secs: u64,
    description: &str,
) -> Result<T> {
    tokio::time::timeout(Duration::from_secs(timeout_secs), operation)
        .await
        .with_context(|| format!("{description} timed out after {timeout_secs}s"))?
}
