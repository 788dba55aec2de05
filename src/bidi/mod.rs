//! Bidirectional text segmentation
//!
//! Scans block text for runs of right-to-left script (Hebrew, Arabic) and
//! marks them so the rendered document flows correctly. Two policies exist;
//! a deployment picks one:
//!
//! - `Block`: any right-to-left character anywhere in a block flips the
//!   whole block to `dir="rtl"` with right alignment.
//! - `Runs` (default): every maximal right-to-left run in every text node is
//!   wrapped in a `dir="rtl"` span, leaving surrounding text in its original
//!   left-to-right flow. Strictly more precise for mixed-direction text.
//!
//! Segmentation never alters text content; it only wraps or tags it.
//! Concatenating all text nodes in order yields exactly the input text.
//! Text inside excluded zones (code blocks, math subtrees, script/style
//! content) is never segmented.

use kuchiki::NodeRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::utils::dom::{fragment_element, is_math_root};

/// Character class covering the right-to-left scripts handled here:
/// Hebrew U+0590–U+05FF and Arabic U+0600–U+06FF.
pub const RTL_CHAR_CLASS: &str = r"[\u{0590}-\u{05FF}\u{0600}-\u{06FF}]";

static RTL_CHAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(RTL_CHAR_CLASS).expect("RTL_CHAR_RE: hardcoded regex is valid")
});

/// A maximal right-to-left run: one or more RTL segments joined by
/// whitespace. Whitespace is absorbed only between RTL segments, never at
/// the edges of a run.
static RTL_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{RTL_CHAR_CLASS}+(?:\\s+{RTL_CHAR_CLASS}+)*"))
        .expect("RTL_RUN_RE: hardcoded regex is valid")
});

/// Tags whose text content is never segmented.
const EXCLUDED_TAGS: &[&str] = &["pre", "code", "script", "style"];

/// Bidirectional-text handling policy. One is chosen per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidiPolicy {
    /// Flip whole blocks that contain any right-to-left character.
    Block,
    /// Wrap each right-to-left run in a direction-tagged span.
    Runs,
}

/// A contiguous right-to-left text segment within one text node.
///
/// Produced transiently during segmentation and immediately materialized
/// into direction-tagged wrapper nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte offset of the run's start within the owning text node.
    pub start: usize,
    /// Byte offset one past the run's end.
    pub end: usize,
    /// The run's text.
    pub text: String,
}

/// True when the text contains at least one right-to-left character.
pub fn has_rtl(text: &str) -> bool {
    RTL_CHAR_RE.is_match(text)
}

/// Find every maximal right-to-left run in a text, in order.
pub fn segment_text(text: &str) -> Vec<BidiRun> {
    RTL_RUN_RE
        .find_iter(text)
        .map(|m| BidiRun {
            start: m.start(),
            end: m.end(),
            text: m.as_str().to_string(),
        })
        .collect()
}

/// Apply the configured bidi policy to the assembled tree.
pub fn apply(root: &NodeRef, policy: BidiPolicy) {
    match policy {
        BidiPolicy::Block => mark_blocks(root),
        BidiPolicy::Runs => segment_runs(root),
    }
}

/// Block-level policy: flip whole Q/A blocks containing RTL text.
fn mark_blocks(root: &NodeRef) {
    let blocks: Vec<NodeRef> = match root.select("[data-role]") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };
    for block in blocks {
        if !has_rtl(&block.text_contents()) {
            continue;
        }
        if let Some(element) = block.as_element() {
            let mut attrs = element.attributes.borrow_mut();
            attrs.insert("dir", "rtl".to_string());
            let merged = match attrs.get("style") {
                Some(existing) if !existing.trim().is_empty() => {
                    format!("{} text-align: right;", existing.trim_end())
                }
                _ => "text-align: right;".to_string(),
            };
            attrs.insert("style", merged);
        }
    }
}

/// Run-level policy: wrap each maximal RTL run in a `dir="rtl"` span.
fn segment_runs(root: &NodeRef) {
    let mut text_nodes = Vec::new();
    collect_text_nodes(root, &mut text_nodes);

    for text_node in text_nodes {
        let text = match text_node.as_text() {
            Some(contents) => contents.borrow().clone(),
            None => continue,
        };
        let runs = segment_text(&text);
        if runs.is_empty() {
            continue;
        }

        let mut replacements: Vec<NodeRef> = Vec::new();
        let mut cursor = 0;
        let mut failed = false;
        for run in &runs {
            if run.start > cursor {
                replacements.push(NodeRef::new_text(&text[cursor..run.start]));
            }
            let wrapped = format!(
                r#"<span dir="rtl">{}</span>"#,
                html_escape::encode_text(&run.text)
            );
            match fragment_element(&wrapped) {
                Ok(span) => replacements.push(span),
                Err(e) => {
                    log::warn!("Failed to build rtl wrapper span, leaving text node as-is: {e:#}");
                    failed = true;
                    break;
                }
            }
            cursor = run.end;
        }
        if failed {
            continue;
        }
        if cursor < text.len() {
            replacements.push(NodeRef::new_text(&text[cursor..]));
        }

        for replacement in replacements {
            text_node.insert_before(replacement);
        }
        text_node.detach();
    }
}

/// Collect text nodes in document order, skipping excluded zones.
fn collect_text_nodes(node: &NodeRef, out: &mut Vec<NodeRef>) {
    if let Some(element) = node.as_element() {
        let tag = element.name.local.as_ref();
        if EXCLUDED_TAGS.contains(&tag) || is_math_root(element) {
            return;
        }
    } else if node.as_text().is_some() {
        out.push(node.clone());
        return;
    }
    for child in node.children() {
        collect_text_nodes(&child, out);
    }
}
