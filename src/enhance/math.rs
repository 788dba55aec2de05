//! Math typesetting coordination
//!
//! The typesetting capability (MathJax) runs inside the rendering surface,
//! not in this process. This coordinator prepares the assembled tree for
//! that pass: it injects the typesetter configuration (the fixed delimiter
//! set and the trust flag) followed by the loader script, as the first
//! children of the container. The surface executes both before pagination.
//!
//! If the bundle fails to load inside the surface, math stays as raw
//! delimiter text in the output; the surface cannot report that back.

use kuchiki::NodeRef;
use serde::Serialize;

use crate::error::{ExportError, ExportResult};
use crate::utils::dom::fragment_element;

use super::MathTypesetter;

/// Build a script node.
///
/// A bare `<script>` parsed as a document gets hoisted into `<head>`;
/// wrapping it in a div keeps it in body context, where the fragment
/// helpers can reach it.
fn script_node(script_html: &str) -> ExportResult<NodeRef> {
    let wrapper = fragment_element(&format!("<div>{script_html}</div>"))?;
    wrapper
        .children()
        .find(|node| node.as_element().is_some())
        .ok_or_else(|| ExportError::Other(format!("script fragment produced no element: {script_html}")))
}

/// Delimiter configuration handed to the typesetting capability.
///
/// Display mode: `$$...$$` and `\[...\]`. Inline mode: `$...$` and
/// `\(...\)`.
#[derive(Debug, Clone, Serialize)]
pub struct MathConfig {
    pub inline_delimiters: Vec<[String; 2]>,
    pub display_delimiters: Vec<[String; 2]>,
    /// Trust raw-markup math commands. An explicit trade-off the host
    /// accepts: conversation content may use any TeX macro.
    pub trusted: bool,
    pub bundle_url: String,
}

impl MathConfig {
    pub fn new(bundle_url: impl Into<String>, trusted: bool) -> Self {
        let pair = |a: &str, b: &str| [a.to_string(), b.to_string()];
        Self {
            inline_delimiters: vec![pair("$", "$"), pair(r"\(", r"\)")],
            display_delimiters: vec![pair("$$", "$$"), pair(r"\[", r"\]")],
            trusted,
            bundle_url: bundle_url.into(),
        }
    }
}

/// MathJax-backed implementation of the typesetting capability.
#[derive(Debug)]
pub struct MathJaxTypesetter {
    config: MathConfig,
}

impl MathJaxTypesetter {
    /// # Errors
    ///
    /// `CapabilityUnavailable` when the bundle URL does not parse; the
    /// typesetter is one of the pipeline's ordered capability steps.
    pub fn new(config: MathConfig) -> ExportResult<Self> {
        url::Url::parse(&config.bundle_url)
            .map_err(|e| ExportError::capability("math-typesetter", e))?;
        Ok(Self { config })
    }

    fn config_json(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "tex": {
                "inlineMath": self.config.inline_delimiters,
                "displayMath": self.config.display_delimiters,
                "processEscapes": true,
            },
            "options": {
                "enableMenu": false,
            },
        });
        if !self.config.trusted {
            value["loader"] = serde_json::json!({ "load": ["ui/safe"] });
        }
        value
    }
}

impl MathTypesetter for MathJaxTypesetter {
    fn typeset(&self, root: &NodeRef) -> ExportResult<()> {
        let config_script = script_node(&format!(
            "<script>window.MathJax = {};</script>",
            self.config_json()
        ))?;
        let loader_script = script_node(&format!(
            r#"<script async src="{}"></script>"#,
            self.config.bundle_url
        ))?;

        // Configuration must precede the loader in document order
        root.prepend(loader_script);
        root.prepend(config_script);

        log::debug!(
            "Injected math typesetting pass (trusted: {})",
            self.config.trusted
        );
        Ok(())
    }
}
