//! Core configuration types for conversation export
//!
//! This module contains the main `ExportConfig` struct that defines the
//! configuration parameters for one export operation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::bidi::BidiPolicy;

/// Main configuration struct for one conversation export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where the rendered conversation comes from: an `http(s)` URL captured
    /// through the browser session, or a path to a saved snapshot file.
    pub(crate) source: String,

    /// Output filename.
    ///
    /// **INVARIANT:** normalized in the builder: trimmed, filesystem-safe,
    /// `.pdf`-suffixed. An empty value survives normalization untouched and
    /// makes the pipeline return `Cancelled` before any work begins.
    pub(crate) filename: String,

    /// Directory the PDF is written into.
    pub(crate) output_dir: PathBuf,

    /// Uniform font size applied by the sanitizer's style contract
    /// (any CSS length, e.g. "12px" or "11pt").
    pub(crate) font_size: String,

    /// Selector for user-turn (question) nodes in the source document.
    ///
    /// Selection criteria are environment configuration, not pipeline logic:
    /// they change when the conversation UI's markup changes.
    pub(crate) question_selector: String,

    /// Selector for assistant-turn (answer) nodes.
    pub(crate) answer_selector: String,

    /// Removal set: elements stripped from every block subtree.
    pub(crate) strip_selectors: Vec<String>,

    /// Bidirectional-text handling policy (one per deployment).
    pub(crate) bidi_policy: BidiPolicy,

    /// Syntect theme used by the highlighting capability.
    pub(crate) highlight_theme: String,

    /// MathJax bundle loaded into the rendering surface.
    pub(crate) math_bundle_url: String,

    /// Whether raw-markup math commands are trusted.
    ///
    /// An explicit security trade-off: conversation content is the only
    /// input, and the host accepts its math macros as-is.
    pub(crate) math_trusted: bool,

    /// Run the browser headless.
    pub(crate) headless: bool,

    /// Page margin in inches on all four sides.
    pub(crate) margin_inches: f64,

    /// JPEG quality for rasterized images, 0.0–1.0.
    pub(crate) image_quality: f64,

    /// Rasterization scale factor.
    pub(crate) raster_scale: f64,

    /// Prefer not to split block-level content across pages.
    pub(crate) avoid_page_breaks: bool,

    /// Timeout in seconds for `page.goto()` during live capture.
    ///
    /// Prevents hangs on slow DNS, unresponsive servers, or streaming
    /// content. Default: 30 seconds.
    pub(crate) page_load_timeout_secs: u64,

    /// Settle time in milliseconds after content load, before pagination.
    pub(crate) settle_ms: u64,
}
