//! Small DOM helpers shared by the mutation passes
//!
//! All tree mutation in this crate goes through kuchiki. Elements are built
//! by parsing small HTML fragments and splicing their body children into the
//! target tree, which keeps construction readable and lets html5ever own the
//! parsing rules.

use anyhow::{Context, Result};
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeRef};

/// Parse an HTML fragment and return the nodes it produces.
///
/// `kuchiki::parse_html` always builds a full document; the fragment's
/// content lands under `<body>`, so the body's children are the nodes the
/// caller actually wrote.
pub fn fragment_nodes(html: &str) -> Vec<NodeRef> {
    let document = kuchiki::parse_html().one(html.to_string());
    match document.select_first("body") {
        Ok(body) => body.as_node().children().collect(),
        Err(()) => Vec::new(),
    }
}

/// Parse an HTML fragment expected to produce exactly one element.
pub fn fragment_element(html: &str) -> Result<NodeRef> {
    fragment_nodes(html)
        .into_iter()
        .find(|node| node.as_element().is_some())
        .with_context(|| format!("fragment produced no element: {html}"))
}

/// Serialize a node including itself.
pub fn serialize_node(node: &NodeRef) -> Result<String> {
    let mut output = Vec::new();
    node.serialize(&mut output)
        .context("Failed to serialize DOM node")?;
    String::from_utf8(output).context("Serialized HTML was not valid UTF-8")
}

/// Serialize a node's children (inner HTML).
pub fn inner_html(node: &NodeRef) -> Result<String> {
    let mut output = Vec::new();
    for child in node.children() {
        child
            .serialize(&mut output)
            .context("Failed to serialize DOM child node")?;
    }
    String::from_utf8(output).context("Serialized HTML was not valid UTF-8")
}

/// Append CSS declarations to an element's `style` attribute.
///
/// Later declarations win under CSS rules, so appending is how a pass layers
/// its styling over whatever the style contract already set.
pub fn append_style(node: &NodeRef, declarations: &str) {
    let Some(element) = node.as_element() else {
        return;
    };
    let mut attrs = element.attributes.borrow_mut();
    let merged = match attrs.get("style") {
        Some(existing) if !existing.trim().is_empty() => {
            let sep = if existing.trim_end().ends_with(';') {
                " "
            } else {
                "; "
            };
            format!("{existing}{sep}{declarations}")
        }
        _ => declarations.to_string(),
    };
    attrs.insert("style", merged);
}

/// True for the root element of a math-rendering subtree.
///
/// The external typesetter owns everything below (and including) these
/// elements; the sanitizer leaves their styling alone and the bidi
/// segmenter never splits their text.
pub fn is_math_root(element: &ElementData) -> bool {
    let tag = element.name.local.as_ref();
    if tag == "math" || tag == "mjx-container" {
        return true;
    }
    let attrs = element.attributes.borrow();
    match attrs.get("class") {
        Some(class) => class
            .split_whitespace()
            .any(|token| token.starts_with("katex")),
        None => false,
    }
}

/// Move every child of `from` to the end of `to`, preserving order.
pub fn move_children(from: &NodeRef, to: &NodeRef) {
    let children: Vec<NodeRef> = from.children().collect();
    for child in children {
        child.detach();
        to.append(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_nodes_returns_body_children() {
        let nodes = fragment_nodes("<p>one</p><p>two</p>");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text_contents(), "one");
    }

    #[test]
    fn test_append_style_merges() {
        let div = fragment_element(r#"<div style="color: red;"></div>"#).unwrap();
        append_style(&div, "width: 100%;");
        let attrs = div.as_element().unwrap().attributes.borrow();
        assert_eq!(attrs.get("style"), Some("color: red; width: 100%;"));
    }

    #[test]
    fn test_append_style_sets_when_absent() {
        let div = fragment_element("<div></div>").unwrap();
        append_style(&div, "width: 100%;");
        let attrs = div.as_element().unwrap().attributes.borrow();
        assert_eq!(attrs.get("style"), Some("width: 100%;"));
    }

    #[test]
    fn test_inner_html_round_trip() {
        let div = fragment_element("<div><b>bold</b> text</div>").unwrap();
        assert_eq!(inner_html(&div).unwrap(), "<b>bold</b> text");
    }
}
