//! Read accessors for `ExportConfig`
//!
//! Fields are `pub(crate)`; external callers read through these.

use std::path::Path;

use crate::bidi::BidiPolicy;

use super::types::ExportConfig;

impl ExportConfig {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn font_size(&self) -> &str {
        &self.font_size
    }

    pub fn question_selector(&self) -> &str {
        &self.question_selector
    }

    pub fn answer_selector(&self) -> &str {
        &self.answer_selector
    }

    pub fn strip_selectors(&self) -> &[String] {
        &self.strip_selectors
    }

    pub fn bidi_policy(&self) -> BidiPolicy {
        self.bidi_policy
    }

    pub fn highlight_theme(&self) -> &str {
        &self.highlight_theme
    }

    pub fn math_bundle_url(&self) -> &str {
        &self.math_bundle_url
    }

    pub fn math_trusted(&self) -> bool {
        self.math_trusted
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    pub fn margin_inches(&self) -> f64 {
        self.margin_inches
    }

    pub fn image_quality(&self) -> f64 {
        self.image_quality
    }

    pub fn raster_scale(&self) -> f64 {
        self.raster_scale
    }

    pub fn avoid_page_breaks(&self) -> bool {
        self.avoid_page_breaks
    }

    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }

    pub fn settle_ms(&self) -> u64 {
        self.settle_ms
    }
}
