//! Export adapter: hand the assembled tree to the document renderer
//!
//! The renderer contract is a configuration bag (margins, filename, image
//! settings, rasterization scale, page format, page-break policy) plus the
//! serialized tree; the capability produces PDF bytes asynchronously. Each
//! renderer maps the subset of the bag its surface supports; CDP printing
//! has no JPEG-quality knob, so that setting is advisory there.
//!
//! The tree is materialized in a live page only inside `render`, so the
//! renderer can paginate from real layout metrics, and the page is released
//! on every exit path, success or failure.

pub mod browser;

use anyhow::Result;
use chromiumoxide::{Page, cdp};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use crate::error::{ExportError, ExportResult};
use crate::utils::constants::{LETTER_HEIGHT_INCHES, LETTER_WIDTH_INCHES};

use browser::BrowserSession;

/// Configuration bag handed to the document-rendering capability.
#[derive(Debug, Clone)]
pub struct PdfSettings {
    /// Output filename (already normalized, `.pdf`-suffixed).
    pub filename: String,
    /// Page margin in inches on all four sides.
    pub margin_inches: f64,
    /// JPEG quality for rasterized images, 0.0–1.0. Advisory.
    pub image_quality: f64,
    /// Rasterization scale factor (device pixels per CSS pixel).
    pub raster_scale: f64,
    /// Prefer not to split block-level content across pages.
    pub avoid_page_breaks: bool,
    /// Settle time after content load, before pagination, in ms.
    pub settle_ms: u64,
}

/// What one completed export produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub pdf_path: PathBuf,
    pub bytes_written: usize,
    pub pair_count: usize,
}

/// Document-rendering capability: a detached tree plus a configuration bag
/// in, PDF bytes out, asynchronously.
pub trait DocumentRenderer {
    fn render<'a>(
        &'a self,
        html: &'a str,
        settings: &'a PdfSettings,
    ) -> Pin<Box<dyn Future<Output = ExportResult<Vec<u8>>> + Send + 'a>>;
}

/// Wrap the serialized container into a printable document.
///
/// The break-avoidance policy is expressed as CSS so the surface's paginator
/// honors it alongside any break points the content itself declares.
pub fn wrap_document(container_html: &str, avoid_page_breaks: bool) -> String {
    let break_css = if avoid_page_breaks {
        "div, p, pre, table, ul, ol, blockquote, img { break-inside: avoid; page-break-inside: avoid; }"
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>{break_css}</style></head><body>{container_html}</body></html>"
    )
}

/// Renderer backed by a headless Chromium session (CDP `Page.printToPDF`).
pub struct ChromiumRenderer<'s> {
    session: &'s BrowserSession,
}

impl<'s> ChromiumRenderer<'s> {
    pub fn new(session: &'s BrowserSession) -> Self {
        Self { session }
    }

    async fn render_on_page(
        &self,
        page: &Page,
        html: &str,
        settings: &PdfSettings,
    ) -> Result<Vec<u8>> {
        // 2x rasterization for crisp print output
        page.execute(
            cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams::builder()
                .width(1920)
                .height(1080)
                .device_scale_factor(settings.raster_scale)
                .mobile(false)
                .build()
                .map_err(anyhow::Error::msg)?,
        )
        .await?;

        page.set_content(html.to_string()).await?;
        page.wait_for_navigation().await?;

        // Give the in-surface typesetting pass time to finish; the promise
        // wait is best-effort and the settle delay backstops it.
        let _ = page
            .evaluate(
                "window.MathJax && MathJax.startup && MathJax.startup.promise \
                 ? MathJax.startup.promise.then(() => true) : true",
            )
            .await;
        tokio::time::sleep(Duration::from_millis(settings.settle_ms)).await;

        let params = cdp::browser_protocol::page::PrintToPdfParams {
            landscape: Some(false),
            print_background: Some(true),
            prefer_css_page_size: Some(false),
            paper_width: Some(LETTER_WIDTH_INCHES),
            paper_height: Some(LETTER_HEIGHT_INCHES),
            margin_top: Some(settings.margin_inches),
            margin_bottom: Some(settings.margin_inches),
            margin_left: Some(settings.margin_inches),
            margin_right: Some(settings.margin_inches),
            ..Default::default()
        };

        let bytes = page.pdf(params).await?;
        Ok(bytes)
    }
}

impl DocumentRenderer for ChromiumRenderer<'_> {
    fn render<'a>(
        &'a self,
        html: &'a str,
        settings: &'a PdfSettings,
    ) -> Pin<Box<dyn Future<Output = ExportResult<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let page = self
                .session
                .browser()
                .new_page("about:blank")
                .await
                .map_err(|e| ExportError::capability("document-renderer", e))?;

            // The page is the transient rendering surface; it is closed on
            // every exit path, success or failure.
            let result = self.render_on_page(&page, html, settings).await;
            if let Err(e) = page.close().await {
                log::warn!("Failed to close rendering page: {e}");
            }

            result.map_err(|e| ExportError::ExportFailure(format!("{e:#}")))
        })
    }
}

/// Render the wrapped document and write the PDF next to the configured
/// output directory. Reports completion through the returned summary.
pub async fn export_document(
    container_html: &str,
    settings: &PdfSettings,
    renderer: &dyn DocumentRenderer,
    output_dir: &std::path::Path,
    pair_count: usize,
) -> ExportResult<ExportSummary> {
    let document = wrap_document(container_html, settings.avoid_page_breaks);
    let bytes = renderer.render(&document, settings).await?;

    tokio::fs::create_dir_all(output_dir).await?;
    let pdf_path = output_dir.join(&settings.filename);
    tokio::fs::write(&pdf_path, &bytes).await?;

    log::info!(
        "Wrote {} ({} bytes, {} pair(s))",
        pdf_path.display(),
        bytes.len(),
        pair_count
    );

    Ok(ExportSummary {
        pdf_path,
        bytes_written: bytes.len(),
        pair_count,
    })
}
