//! Snapshot acquisition
//!
//! The pipeline operates on an HTML snapshot of the rendered conversation.
//! Two ways to get one: capture a live page through the browser session, or
//! read a snapshot file saved earlier. Either way the pipeline only ever
//! reads from the result; the source document is never mutated.

use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::error::ExportResult;
use crate::export::browser::{BrowserSession, with_page_timeout};

/// Where the rendered conversation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationSource {
    /// Live page, captured through the browser session.
    Url(Url),
    /// Saved snapshot file.
    File(PathBuf),
}

impl ConversationSource {
    /// Classify a raw source string: `http(s)` URLs are captured live,
    /// everything else is treated as a file path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            if let Ok(url) = Url::parse(raw) {
                return Self::Url(url);
            }
        }
        Self::File(PathBuf::from(raw))
    }
}

/// Load the snapshot for the configured source.
pub async fn load_snapshot(
    source: &ConversationSource,
    session: &BrowserSession,
    page_load_timeout_secs: u64,
) -> ExportResult<String> {
    match source {
        ConversationSource::File(path) => {
            let html = tokio::fs::read_to_string(path).await?;
            log::debug!("Read snapshot file {} ({} bytes)", path.display(), html.len());
            Ok(html)
        }
        ConversationSource::Url(url) => {
            Ok(capture_page(session, url, page_load_timeout_secs).await?)
        }
    }
}

/// Navigate to the conversation page and snapshot its rendered HTML.
async fn capture_page(
    session: &BrowserSession,
    url: &Url,
    page_load_timeout_secs: u64,
) -> Result<String> {
    let page = session
        .browser()
        .new_page("about:blank")
        .await
        .context("Failed to create capture page")?;

    let result = async {
        with_page_timeout(
            async {
                page.goto(url.as_str())
                    .await
                    .map_err(|e| anyhow::anyhow!("{e}"))
            },
            page_load_timeout_secs,
            "Page navigation",
        )
        .await?;

        with_page_timeout(
            async {
                page.wait_for_navigation()
                    .await
                    .map_err(|e| anyhow::anyhow!("{e}"))
            },
            page_load_timeout_secs,
            "Page load",
        )
        .await?;

        page.content()
            .await
            .context("Failed to read rendered page content")
    }
    .await;

    if let Err(e) = page.close().await {
        log::warn!("Failed to close capture page: {e}");
    }

    match &result {
        Ok(html) => log::debug!("Captured {} ({} bytes)", url, html.len()),
        Err(e) => log::warn!("Capture failed for {url}: {e:#}"),
    }
    result
}
