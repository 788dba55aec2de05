//! Conversation pairing extractor
//!
//! Walks the source document read-only and collects ordered question/answer
//! node pairs. The source tree is never mutated: each matched node
//! contributes a markup snapshot (`inner_html`) and nothing else.
//!
//! Pairing is by parallel index across the two separately-queried
//! collections, truncated to the shorter one. The Nth question node is
//! assumed to correspond to the Nth answer node; the conversation UI renders
//! turns strictly alternating, but nothing here verifies that. Pairing by
//! DOM interleaving would be more robust; the truncate-to-shorter behavior
//! is kept deliberately because it is the observable contract callers rely
//! on.

use scraper::{Html, Selector};

use crate::error::{ExportError, ExportResult};

/// One question node paired with its corresponding answer node,
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPair {
    /// 1-based position of the pair, strictly increasing in document order.
    pub index: usize,
    /// Markup snapshot of the question node's subtree.
    pub question_html: String,
    /// Markup snapshot of the answer node's subtree.
    pub answer_html: String,
}

/// Collect ordered question/answer pairs from a rendered-page snapshot.
///
/// Produces `min(|questions|, |answers|)` pairs; excess nodes on either side
/// are silently discarded, never an error.
///
/// # Errors
///
/// * `ExportError::ExtractionEmpty`: no pairable conversation (zero
///   questions or zero answers).
/// * `ExportError::Config`: a selector fails to parse. Selectors are
///   validated at config build time, so this only fires for selectors that
///   bypassed the builder.
pub fn extract_pairs(
    snapshot_html: &str,
    question_selector: &str,
    answer_selector: &str,
) -> ExportResult<Vec<ConversationPair>> {
    let questions = Selector::parse(question_selector).map_err(|e| {
        ExportError::Config(format!("invalid question selector '{question_selector}': {e}"))
    })?;
    let answers = Selector::parse(answer_selector).map_err(|e| {
        ExportError::Config(format!("invalid answer selector '{answer_selector}': {e}"))
    })?;

    let document = Html::parse_document(snapshot_html);

    let question_nodes: Vec<String> = document
        .select(&questions)
        .map(|el| el.inner_html())
        .collect();
    let answer_nodes: Vec<String> = document.select(&answers).map(|el| el.inner_html()).collect();

    let count = question_nodes.len().min(answer_nodes.len());
    if count == 0 {
        log::info!(
            "No pairable conversation: {} question node(s), {} answer node(s)",
            question_nodes.len(),
            answer_nodes.len()
        );
        return Err(ExportError::ExtractionEmpty);
    }

    if question_nodes.len() != answer_nodes.len() {
        log::debug!(
            "Unbalanced turn counts ({} questions, {} answers); truncating to {}",
            question_nodes.len(),
            answer_nodes.len(),
            count
        );
    }

    let pairs = question_nodes
        .into_iter()
        .zip(answer_nodes)
        .take(count)
        .enumerate()
        .map(|(i, (question_html, answer_html))| ConversationPair {
            index: i + 1,
            question_html,
            answer_html,
        })
        .collect();

    Ok(pairs)
}
