//! Rendering coordinators: math typesetting and code highlighting
//!
//! Both passes are external capabilities with narrow contracts. The
//! typesetter takes the tree root plus a delimiter/trust configuration and
//! mutates the tree in place; the highlighter takes one code element and
//! mutates it in place. This module owns the coordination: walking the
//! assembled tree, detecting code languages, and invoking the capabilities
//! in order.

pub mod highlight;
pub mod language;
pub mod math;

pub use highlight::SyntectHighlighter;
pub use math::{MathConfig, MathJaxTypesetter};

use kuchiki::NodeRef;

use crate::error::ExportResult;

/// Math typesetting capability: mutates the tree in place, synchronously.
pub trait MathTypesetter {
    fn typeset(&self, root: &NodeRef) -> ExportResult<()>;
}

/// Syntax highlighting capability: mutates one code element in place,
/// synchronously.
pub trait CodeHighlighter {
    fn highlight(&self, code: &NodeRef, language: Option<&str>) -> ExportResult<()>;
}

/// Run the code pass over every code block in the assembled tree.
///
/// For each `pre > code` element: detect the language, attach it as a
/// `language-{tag}` class when found, then invoke the highlighting
/// capability. Detection failure is non-fatal; highlighting proceeds
/// without a hint. A capability error aborts the export.
pub fn highlight_code_blocks(root: &NodeRef, highlighter: &dyn CodeHighlighter) -> ExportResult<()> {
    let code_blocks: Vec<NodeRef> = match root.select("pre code") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };

    for code in &code_blocks {
        let lang = language::language_for_code_block(code);
        if let Some(tag) = &lang {
            attach_language_class(code, tag);
        }
        highlighter.highlight(code, lang.as_deref())?;
    }

    if !code_blocks.is_empty() {
        log::debug!("Highlighted {} code block(s)", code_blocks.len());
    }
    Ok(())
}

/// Attach `language-{tag}` to the code element's class list, once.
fn attach_language_class(code: &NodeRef, tag: &str) {
    let Some(element) = code.as_element() else {
        return;
    };
    let mut attrs = element.attributes.borrow_mut();
    let token = format!("language-{tag}");
    let class = match attrs.get("class") {
        Some(existing) if !existing.trim().is_empty() => {
            if existing.split_whitespace().any(|t| t == token) {
                return;
            }
            format!("{existing} {token}")
        }
        _ => token,
    };
    attrs.insert("class", class);
}
