//! Shared configuration constants for convoprint
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default selector for user-turn (question) nodes.
///
/// Matches the conversation UI's current question markers. This is
/// environment configuration, not pipeline logic: hosting contexts with
/// different markup override it via `ExportConfig`.
pub const DEFAULT_QUESTION_SELECTOR: &str =
    r#"[data-message-author-role="user"] .whitespace-pre-wrap"#;

/// Default selector for assistant-turn (answer) nodes.
pub const DEFAULT_ANSWER_SELECTOR: &str = r#"[data-message-author-role="assistant"] .markdown"#;

/// Default removal set: interactive and editing-affordance elements that
/// must not survive into the print document.
pub const DEFAULT_STRIP_SELECTORS: &[&str] = &[
    "button",
    ".copy-button",
    ".edit-button",
    "[aria-label='Copy code']",
];

/// Default uniform font size applied by the sanitizer's style contract.
pub const DEFAULT_FONT_SIZE: &str = "12px";

/// Default output filename stem (`.pdf` is appended at config build time).
pub const DEFAULT_FILENAME_STEM: &str = "chatgpt_conversation";

/// Page margin in inches on all four sides.
pub const PDF_MARGIN_INCHES: f64 = 0.5;

/// JPEG encoding quality for rasterized images, 0.0–1.0.
///
/// Advisory: renderers that embed images without re-encoding ignore it.
pub const PDF_IMAGE_QUALITY: f64 = 0.98;

/// Rasterization scale factor (device pixels per CSS pixel).
///
/// 2× keeps text and rasterized content crisp at print resolution.
pub const PDF_RASTER_SCALE: f64 = 2.0;

/// US Letter paper size in inches.
pub const LETTER_WIDTH_INCHES: f64 = 8.5;
pub const LETTER_HEIGHT_INCHES: f64 = 11.0;

/// How long the rendering surface is given to settle after content load
/// before pagination, in milliseconds.
///
/// The math typesetting pass runs inside the surface; typesetting a long
/// conversation takes a moment after the load event fires.
pub const TYPESET_SETTLE_MS: u64 = 750;

/// MathJax v3 bundle loaded into the rendering surface.
///
/// Overridable via `ExportConfig` for offline deployments that ship a
/// local bundle.
pub const MATHJAX_BUNDLE_URL: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js";

/// Syntect theme used for code highlighting.
///
/// A light theme: the output is a print document on white paper.
pub const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Chrome user agent string for the capture session
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
