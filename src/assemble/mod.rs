//! Document assembly
//!
//! Builds the transient output container: one detached tree holding labeled
//! question/answer blocks in extraction order. Each pair's markup goes
//! through the sanitizer before insertion, and the table formatter runs once
//! per assembled block. The container stays detached here; only the export
//! adapter materializes it in a live rendering surface, and releases it on
//! every exit path.

use kuchiki::NodeRef;

use crate::error::ExportResult;
use crate::extract::ConversationPair;
use crate::sanitize::{Sanitizer, tables};
use crate::utils::dom::{fragment_element, serialize_node};

/// The transient output tree, exclusively owned by the pipeline for the
/// duration of one export.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    root: NodeRef,
    pair_count: usize,
}

impl DocumentTree {
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Serialize the container (including itself) to markup.
    pub fn to_html(&self) -> ExportResult<String> {
        Ok(serialize_node(&self.root)?)
    }
}

/// Assemble the output container from extracted pairs.
///
/// Blocks appear in increasing pair-index order, each question immediately
/// followed by its answer. No reordering, no deduplication beyond the
/// extractor's truncation.
pub fn assemble(
    pairs: &[ConversationPair],
    sanitizer: &Sanitizer,
    font_size: &str,
) -> ExportResult<DocumentTree> {
    let mut html = format!(
        r#"<div style="padding: 20px; font-family: Arial, sans-serif; font-size: {font_size}; line-height: 1.6;">"#
    );

    for pair in pairs {
        let question = sanitizer.sanitize(&pair.question_html);
        let answer = sanitizer.sanitize(&pair.answer_html);

        html.push_str(&format!(
            r#"<div data-role="question" style="margin: 20px 0; color: red;"><span style="font-weight: bold; font-size: {font_size};">Q{index}: </span><span style="font-size: {font_size};">{question}</span></div>"#,
            index = pair.index,
        ));
        html.push_str(&format!(
            r#"<div data-role="answer" style="margin: 10px 0 24px 0; color: black; font-size: {font_size};"><span style="font-size: {font_size};">{answer}</span></div>"#,
        ));
    }
    html.push_str("</div>");

    let root = fragment_element(&html)?;

    // Table formatting runs exactly once per block per pipeline invocation.
    let blocks: Vec<NodeRef> = match root.select("[data-role]") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };
    for block in &blocks {
        tables::format_tables(block);
    }

    log::debug!("Assembled {} conversation pair(s)", pairs.len());

    Ok(DocumentTree {
        root,
        pair_count: pairs.len(),
    })
}
