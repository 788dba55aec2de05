//! Type-safe builder for `ExportConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time
//! validation ensuring that the conversation source is set before building
//! an `ExportConfig`.

use crate::bidi::BidiPolicy;
use crate::utils::constants::{
    DEFAULT_ANSWER_SELECTOR, DEFAULT_FILENAME_STEM, DEFAULT_FONT_SIZE, DEFAULT_QUESTION_SELECTOR,
    DEFAULT_STRIP_SELECTORS, HIGHLIGHT_THEME, MATHJAX_BUNDLE_URL, PDF_IMAGE_QUALITY,
    PDF_MARGIN_INCHES, PDF_RASTER_SCALE, TYPESET_SETTLE_MS,
};
use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::ExportConfig;

/// Normalize a caller-supplied output filename.
///
/// Trims, makes the name filesystem-safe, and appends `.pdf` when missing.
/// An empty (or whitespace-only) name stays empty: the pipeline treats that
/// as a pre-work cancellation rather than a build error, matching the
/// filename-prompt contract of the invoking context.
fn normalize_filename(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let safe = sanitize_filename::sanitize(trimmed);
    if safe.to_ascii_lowercase().ends_with(".pdf") {
        safe
    } else {
        format!("{safe}.pdf")
    }
}

/// Validate that a selector string parses as CSS.
///
/// Compiled here once at config creation to surface typos at build time
/// instead of mid-pipeline.
fn validate_selector(selector: &str) -> Result<()> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| anyhow!("Invalid CSS selector '{selector}': {e}"))
}

// Type states for the builder
pub struct Complete;

pub struct ExportConfigBuilder<State = ()> {
    pub(crate) source: Option<String>,
    pub(crate) filename: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) font_size: String,
    pub(crate) question_selector: String,
    pub(crate) answer_selector: String,
    pub(crate) strip_selectors: Vec<String>,
    pub(crate) bidi_policy: BidiPolicy,
    pub(crate) highlight_theme: String,
    pub(crate) math_bundle_url: String,
    pub(crate) math_trusted: bool,
    pub(crate) headless: bool,
    pub(crate) margin_inches: f64,
    pub(crate) image_quality: f64,
    pub(crate) raster_scale: f64,
    pub(crate) avoid_page_breaks: bool,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) settle_ms: u64,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ExportConfigBuilder<()> {
    fn default() -> Self {
        Self {
            source: None,
            filename: DEFAULT_FILENAME_STEM.to_string(),
            output_dir: PathBuf::from("."),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            question_selector: DEFAULT_QUESTION_SELECTOR.to_string(),
            answer_selector: DEFAULT_ANSWER_SELECTOR.to_string(),
            strip_selectors: DEFAULT_STRIP_SELECTORS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            bidi_policy: BidiPolicy::Runs,
            highlight_theme: HIGHLIGHT_THEME.to_string(),
            math_bundle_url: MATHJAX_BUNDLE_URL.to_string(),
            math_trusted: true,
            headless: true,
            margin_inches: PDF_MARGIN_INCHES,
            image_quality: PDF_IMAGE_QUALITY,
            raster_scale: PDF_RASTER_SCALE,
            avoid_page_breaks: true,
            page_load_timeout_secs: 30,
            settle_ms: TYPESET_SETTLE_MS,
            _phantom: PhantomData,
        }
    }
}

impl ExportConfig {
    /// Create a builder for configuring an `ExportConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ExportConfigBuilder<()> {
        ExportConfigBuilder::default()
    }
}

impl ExportConfigBuilder<()> {
    /// Set the conversation source: an `http(s)` URL or a snapshot file path.
    ///
    /// Required; transitions the builder to the buildable state.
    pub fn source(self, source: impl Into<String>) -> ExportConfigBuilder<Complete> {
        ExportConfigBuilder {
            source: Some(source.into()),
            filename: self.filename,
            output_dir: self.output_dir,
            font_size: self.font_size,
            question_selector: self.question_selector,
            answer_selector: self.answer_selector,
            strip_selectors: self.strip_selectors,
            bidi_policy: self.bidi_policy,
            highlight_theme: self.highlight_theme,
            math_bundle_url: self.math_bundle_url,
            math_trusted: self.math_trusted,
            headless: self.headless,
            margin_inches: self.margin_inches,
            image_quality: self.image_quality,
            raster_scale: self.raster_scale,
            avoid_page_breaks: self.avoid_page_breaks,
            page_load_timeout_secs: self.page_load_timeout_secs,
            settle_ms: self.settle_ms,
            _phantom: PhantomData,
        }
    }
}

impl<State> ExportConfigBuilder<State> {
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn font_size(mut self, font_size: impl Into<String>) -> Self {
        self.font_size = font_size.into();
        self
    }

    pub fn question_selector(mut self, selector: impl Into<String>) -> Self {
        self.question_selector = selector.into();
        self
    }

    pub fn answer_selector(mut self, selector: impl Into<String>) -> Self {
        self.answer_selector = selector.into();
        self
    }

    pub fn strip_selectors(mut self, selectors: Vec<String>) -> Self {
        self.strip_selectors = selectors;
        self
    }

    pub fn bidi_policy(mut self, policy: BidiPolicy) -> Self {
        self.bidi_policy = policy;
        self
    }

    pub fn highlight_theme(mut self, theme: impl Into<String>) -> Self {
        self.highlight_theme = theme.into();
        self
    }

    pub fn math_bundle_url(mut self, url: impl Into<String>) -> Self {
        self.math_bundle_url = url.into();
        self
    }

    pub fn math_trusted(mut self, trusted: bool) -> Self {
        self.math_trusted = trusted;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn margin_inches(mut self, inches: f64) -> Self {
        self.margin_inches = inches;
        self
    }

    pub fn image_quality(mut self, quality: f64) -> Self {
        self.image_quality = quality;
        self
    }

    pub fn raster_scale(mut self, scale: f64) -> Self {
        self.raster_scale = scale;
        self
    }

    pub fn avoid_page_breaks(mut self, avoid: bool) -> Self {
        self.avoid_page_breaks = avoid;
        self
    }

    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }

    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.settle_ms = ms;
        self
    }
}

impl ExportConfigBuilder<Complete> {
    /// Validate and build the final `ExportConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error when the source is empty, a selector does not parse,
    /// the math bundle URL is malformed, or a numeric setting is out of range.
    pub fn build(self) -> Result<ExportConfig> {
        let source = self
            .source
            .ok_or_else(|| anyhow!("source is required"))?
            .trim()
            .to_string();
        if source.is_empty() {
            return Err(anyhow!("source must not be empty"));
        }

        validate_selector(&self.question_selector)?;
        validate_selector(&self.answer_selector)?;
        for selector in &self.strip_selectors {
            validate_selector(selector)?;
        }

        if self.font_size.trim().is_empty() {
            return Err(anyhow!("font_size must not be empty"));
        }

        url::Url::parse(&self.math_bundle_url)
            .map_err(|e| anyhow!("Invalid math bundle URL '{}': {e}", self.math_bundle_url))?;

        if !(0.0..=1.0).contains(&self.image_quality) {
            return Err(anyhow!(
                "image_quality must be within 0.0..=1.0, got {}",
                self.image_quality
            ));
        }
        if self.raster_scale <= 0.0 {
            return Err(anyhow!(
                "raster_scale must be positive, got {}",
                self.raster_scale
            ));
        }
        if self.margin_inches < 0.0 {
            return Err(anyhow!(
                "margin_inches must not be negative, got {}",
                self.margin_inches
            ));
        }

        Ok(ExportConfig {
            source,
            filename: normalize_filename(&self.filename),
            output_dir: self.output_dir,
            font_size: self.font_size.trim().to_string(),
            question_selector: self.question_selector,
            answer_selector: self.answer_selector,
            strip_selectors: self.strip_selectors,
            bidi_policy: self.bidi_policy,
            highlight_theme: self.highlight_theme,
            math_bundle_url: self.math_bundle_url,
            math_trusted: self.math_trusted,
            headless: self.headless,
            margin_inches: self.margin_inches,
            image_quality: self.image_quality,
            raster_scale: self.raster_scale,
            avoid_page_breaks: self.avoid_page_breaks,
            page_load_timeout_secs: self.page_load_timeout_secs,
            settle_ms: self.settle_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_filename_appends_pdf() {
        assert_eq!(normalize_filename("notes"), "notes.pdf");
        assert_eq!(normalize_filename("  notes  "), "notes.pdf");
        assert_eq!(normalize_filename("notes.PDF"), "notes.PDF");
    }

    #[test]
    fn test_normalize_filename_empty_stays_empty() {
        assert_eq!(normalize_filename(""), "");
        assert_eq!(normalize_filename("   "), "");
    }

    #[test]
    fn test_normalize_filename_sanitizes_separators() {
        let name = normalize_filename("a/b\\c");
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_build_rejects_bad_selector() {
        let result = ExportConfig::builder()
            .source("conversation.html")
            .question_selector("..broken[")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_bad_math_url() {
        let result = ExportConfig::builder()
            .source("conversation.html")
            .math_bundle_url("not a url")
            .build();
        assert!(result.is_err());
    }
}
