//! Subtree sanitization: presentation-neutral markup for print
//!
//! This module rewrites a raw markup snapshot (untrusted; it comes from
//! arbitrary rendered content) into the minimal style contract the print
//! document uses:
//! - interactive and editing-affordance elements removed (configurable set)
//! - `class` and `style` attributes cleared everywhere except exemption
//!   zones (code blocks, math-rendering subtrees), whose presentation an
//!   external renderer owns
//! - headings `h1`–`h6` flattened into plain containers
//! - every non-exempt element put on a uniform font weight/size
//! - `pre`/`code` elements colored for monochrome print
//!
//! Re-applying the sanitizer to its own output is a no-op.

pub mod tables;

use anyhow::{Context, Result};
use ego_tree::NodeId;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use crate::utils::dom::{fragment_element, inner_html, is_math_root, move_children};

/// Document-wrapper tags synthesized by the parser; never part of the
/// snapshot content and never styled.
const WRAPPER_TAGS: &[&str] = &["html", "head", "body"];

/// Subtree sanitizer configured with a removal set and the uniform font size.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    strip_selectors: Vec<String>,
    font_size: String,
}

impl Sanitizer {
    pub fn new(strip_selectors: Vec<String>, font_size: impl Into<String>) -> Self {
        Self {
            strip_selectors,
            font_size: font_size.into(),
        }
    }

    /// Sanitize one markup snapshot.
    ///
    /// Total over any markup the extractor can produce. Serialization into a
    /// `Vec` cannot fail in practice; if it ever does, the removal-pass
    /// output is returned so no interactive element survives either way.
    pub fn sanitize(&self, html: &str) -> String {
        let stripped = strip_elements(html, &self.strip_selectors);
        match apply_style_contract(&stripped, &self.font_size) {
            Ok(clean) => clean,
            Err(e) => {
                log::error!("Style contract pass failed, keeping removal-pass output: {e:#}");
                stripped
            }
        }
    }
}

// ============================================================================
// Stage 1: DOM-Based Interactive Element Removal
// ============================================================================

/// Remove elements matching the removal set from an HTML fragment.
///
/// Parses the fragment, collects matching nodes into a removal set, and
/// re-serializes the fragment skipping them. Complexity O(s + n) for s
/// selectors and n nodes.
fn strip_elements(html: &str, remove_selectors: &[String]) -> String {
    let document = Html::parse_fragment(html);
    let root = document.root_element();

    // Parse all selectors upfront - O(s)
    let parsed_selectors: Vec<Selector> = remove_selectors
        .iter()
        .filter_map(|sel_str| match Selector::parse(sel_str) {
            Ok(s) => Some(s),
            Err(e) => {
                log::warn!("Failed to parse removal selector '{sel_str}': {e}");
                None
            }
        })
        .collect();

    // Build HashSet of all elements to remove (NodeId for O(1) lookup) - O(n)
    let mut to_remove: HashSet<NodeId> = HashSet::new();
    for sel in &parsed_selectors {
        for elem in root.select(sel) {
            to_remove.insert(elem.id());
        }
    }

    let mut result = String::new();
    serialize_html_excluding(&root, &to_remove, &mut result);
    result
}

/// Recursively serialize an element's children to HTML, skipping elements
/// in the removal set. Preserves tags, attributes, and nesting.
fn serialize_html_excluding(
    element: &ElementRef,
    to_remove: &HashSet<NodeId>,
    output: &mut String,
) {
    if to_remove.contains(&element.id()) {
        return;
    }

    for child in element.children() {
        use scraper::node::Node;

        match child.value() {
            Node::Text(text) => {
                for ch in text.chars() {
                    match ch {
                        '<' => output.push_str("&lt;"),
                        '>' => output.push_str("&gt;"),
                        '&' => output.push_str("&amp;"),
                        '"' => output.push_str("&quot;"),
                        c => output.push(c),
                    }
                }
            }
            Node::Element(_) => {
                if let Some(child_elem) = ElementRef::wrap(child) {
                    if to_remove.contains(&child_elem.id()) {
                        continue;
                    }

                    let elem_name = child_elem.value().name();
                    output.push('<');
                    output.push_str(elem_name);

                    for (name, value) in child_elem.value().attrs() {
                        output.push(' ');
                        output.push_str(name);
                        output.push_str("=\"");
                        for ch in value.chars() {
                            match ch {
                                '"' => output.push_str("&quot;"),
                                '&' => output.push_str("&amp;"),
                                '<' => output.push_str("&lt;"),
                                '>' => output.push_str("&gt;"),
                                c => output.push(c),
                            }
                        }
                        output.push('"');
                    }
                    output.push('>');

                    const VOID_ELEMENTS: &[&str] = &[
                        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
                        "param", "source", "track", "wbr",
                    ];

                    if VOID_ELEMENTS.contains(&elem_name) {
                        continue;
                    }

                    serialize_html_excluding(&child_elem, to_remove, output);

                    output.push_str("</");
                    output.push_str(elem_name);
                    output.push('>');
                }
            }
            Node::Comment(comment) => {
                output.push_str("<!--");
                output.push_str(comment);
                output.push_str("-->");
            }
            _ => {
                // Document, Doctype, ProcessingInstruction - skip
            }
        }
    }
}

// ============================================================================
// Stage 2: Style Contract
// ============================================================================

/// True when the node sits inside an exemption zone: it is a math root
/// itself, or any ancestor is a code container (`pre`/`code`) or math root.
///
/// The `pre`/`code` elements themselves are NOT exempt: they get the
/// uniform contract plus the print color; only their interiors are left to
/// the external highlighter.
fn in_exemption_zone(node: &NodeRef) -> bool {
    if let Some(element) = node.as_element()
        && is_math_root(element)
    {
        return true;
    }
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if let Some(element) = ancestor.as_element() {
            let tag = element.name.local.as_ref();
            if tag == "pre" || tag == "code" || is_math_root(element) {
                return true;
            }
        }
        current = ancestor.parent();
    }
    false
}

fn is_wrapper(tag: &str) -> bool {
    WRAPPER_TAGS.contains(&tag)
}

/// Apply the uniform style contract to an already-stripped fragment.
///
/// Three passes over one parsed tree: clear `class`/`style`, flatten
/// headings, assign the font contract. The exemption check always runs
/// before the heading check, so a heading inside a code or math subtree is
/// left intact.
fn apply_style_contract(html: &str, font_size: &str) -> Result<String> {
    let document = kuchiki::parse_html().one(html.to_string());

    // Pass 1: clear class and inline-style attributes outside exemption zones
    let elements: Vec<NodeRef> = match document.select("*") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };
    for node in &elements {
        let Some(element) = node.as_element() else {
            continue;
        };
        if is_wrapper(element.name.local.as_ref()) || in_exemption_zone(node) {
            continue;
        }
        let mut attrs = element.attributes.borrow_mut();
        attrs.remove("class");
        attrs.remove("style");
    }

    // Pass 2: flatten headings into plain containers
    let headings: Vec<NodeRef> = match document.select("h1, h2, h3, h4, h5, h6") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };
    for heading in headings {
        if in_exemption_zone(&heading) {
            continue;
        }
        let replacement = fragment_element("<div></div>")?;
        move_children(&heading, &replacement);
        heading.insert_before(replacement);
        heading.detach();
    }

    // Pass 3: uniform font contract; print color on code containers
    let elements: Vec<NodeRef> = match document.select("*") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };
    for node in &elements {
        let Some(element) = node.as_element() else {
            continue;
        };
        let tag = element.name.local.as_ref().to_string();
        if is_wrapper(&tag) || in_exemption_zone(node) {
            continue;
        }
        let style = if tag == "pre" || tag == "code" {
            format!("font-weight: normal; font-size: {font_size}; color: blue;")
        } else {
            format!("font-weight: normal; font-size: {font_size};")
        };
        element.attributes.borrow_mut().insert("style", style);
    }

    let body = document
        .select_first("body")
        .map_err(|()| anyhow::anyhow!("parsed document has no body"))?;
    inner_html(body.as_node()).context("Failed to serialize sanitized fragment")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::DEFAULT_STRIP_SELECTORS;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new(
            DEFAULT_STRIP_SELECTORS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            "12px",
        )
    }

    #[test]
    fn test_removes_interactive_elements() {
        let html = r#"<div><button>Copy</button><span class="copy-button">c</span><p>Content</p></div>"#;
        let result = sanitizer().sanitize(html);
        assert!(!result.contains("<button"));
        assert!(!result.contains("copy-button"));
        assert!(result.contains("Content"));
    }

    #[test]
    fn test_removes_aria_labeled_copy_control() {
        let html = r#"<div><span aria-label="Copy code">copy</span><p>keep</p></div>"#;
        let result = sanitizer().sanitize(html);
        assert!(!result.contains("Copy code"));
        assert!(result.contains("keep"));
    }

    #[test]
    fn test_clears_class_and_style() {
        let html = r#"<div class="prose" style="margin: 4px"><p class="x" style="color: green">hi</p></div>"#;
        let result = sanitizer().sanitize(html);
        assert!(!result.contains("prose"));
        assert!(!result.contains("color: green"));
        assert!(!result.contains("class="));
    }

    #[test]
    fn test_code_interior_retains_styling() {
        let html = r#"<pre><code><span class="hljs-keyword" style="color: purple">fn</span> main</code></pre>"#;
        let result = sanitizer().sanitize(html);
        assert!(result.contains("hljs-keyword"));
        assert!(result.contains("color: purple"));
    }

    #[test]
    fn test_math_subtree_retains_styling() {
        let html = r#"<p>x: <span class="katex"><span class="katex-html" style="top: 1px">x</span></span></p>"#;
        let result = sanitizer().sanitize(html);
        assert!(result.contains("katex-html"));
        assert!(result.contains("top: 1px"));
    }

    #[test]
    fn test_flattens_headings() {
        let html = "<h2>Title <em>em</em></h2><p>body</p>";
        let result = sanitizer().sanitize(html);
        assert!(!result.contains("<h2"));
        assert!(result.contains("Title"));
        assert!(result.contains("<em"));
    }

    #[test]
    fn test_heading_inside_code_not_flattened() {
        // Exemption takes precedence over flattening
        let html = "<pre><code><h1>not a real heading</h1></code></pre>";
        let result = sanitizer().sanitize(html);
        assert!(result.contains("<h1"));
    }

    #[test]
    fn test_uniform_font_contract() {
        let html = "<div><p>a</p><span>b</span></div>";
        let result = sanitizer().sanitize(html);
        let occurrences = result.matches("font-weight: normal; font-size: 12px;").count();
        // div, p, span all carry the contract
        assert_eq!(occurrences, 3);
    }

    #[test]
    fn test_code_containers_get_print_color() {
        let html = "<pre><code>let x = 1;</code></pre>";
        let result = sanitizer().sanitize(html);
        assert!(result.contains("color: blue;"));
    }

    #[test]
    fn test_idempotent() {
        let html = r#"<div class="c" style="x: y"><h3>t</h3><pre><code class="language-rust">fn f() {}</code></pre><p>p &amp; q</p></div>"#;
        let s = sanitizer();
        let once = s.sanitize(html);
        let twice = s.sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_plain_text_preserved() {
        let html = "top-level text <b>and bold</b>";
        let result = sanitizer().sanitize(html);
        assert!(result.contains("top-level text"));
        assert!(result.contains("and bold"));
    }
}
