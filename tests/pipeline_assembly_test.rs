//! End-to-end pipeline tests over a saved conversation snapshot
//!
//! Everything up to the rendering hand-off runs in-process: extraction,
//! sanitization, assembly, bidi segmentation, and both rendering
//! coordinators. Only the browser render itself is out of scope here.

use convoprint::utils::constants::{
    DEFAULT_ANSWER_SELECTOR, DEFAULT_QUESTION_SELECTOR, DEFAULT_STRIP_SELECTORS,
};
use convoprint::{
    BidiPolicy, ExportError, MathConfig, MathJaxTypesetter, MathTypesetter, Sanitizer,
    SyntectHighlighter, assemble, bidi, enhance, extract_pairs,
};

const SNAPSHOT: &str = include_str!("fixtures/conversation.html");

fn default_sanitizer() -> Sanitizer {
    Sanitizer::new(
        DEFAULT_STRIP_SELECTORS
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        "12px",
    )
}

/// Run every in-process stage in pipeline order and return the final markup.
fn assembled_html(policy: BidiPolicy) -> String {
    let pairs = extract_pairs(SNAPSHOT, DEFAULT_QUESTION_SELECTOR, DEFAULT_ANSWER_SELECTOR).unwrap();
    let tree = assemble(&pairs, &default_sanitizer(), "12px").unwrap();
    bidi::apply(tree.root(), policy);

    let typesetter = MathJaxTypesetter::new(MathConfig::new(
        "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js",
        true,
    ))
    .unwrap();
    typesetter.typeset(tree.root()).unwrap();

    let highlighter = SyntectHighlighter::new("InspiredGitHub").unwrap();
    enhance::highlight_code_blocks(tree.root(), &highlighter).unwrap();

    tree.to_html().unwrap()
}

#[test]
fn test_unbalanced_turns_truncate_to_pair_count() {
    // The fixture has 4 question nodes and 3 answer nodes
    let pairs = extract_pairs(SNAPSHOT, DEFAULT_QUESTION_SELECTOR, DEFAULT_ANSWER_SELECTOR).unwrap();
    assert_eq!(pairs.len(), 3);
    assert!(
        !pairs
            .iter()
            .any(|p| p.question_html.contains("unanswered trailing question"))
    );
}

#[test]
fn test_three_pairs_labeled_in_order() {
    let html = assembled_html(BidiPolicy::Runs);

    let q1 = html.find("Q1: ").expect("Q1 label");
    let q2 = html.find("Q2: ").expect("Q2 label");
    let q3 = html.find("Q3: ").expect("Q3 label");
    assert!(q1 < q2 && q2 < q3);
    assert!(!html.contains("Q4: "));

    // each question block immediately precedes its answer block
    let a1 = html.find("systems programming language").unwrap();
    let a2 = html.find("single owner").unwrap();
    assert!(q1 < a1 && a1 < q2 && q2 < a2 && a2 < q3);

    // the extra question never appears in output
    assert!(!html.contains("unanswered trailing question"));
}

#[test]
fn test_sanitization_properties_hold_in_output() {
    let html = assembled_html(BidiPolicy::Runs);

    // UI classes and inline styles from the source are gone
    assert!(!html.contains("prose"));
    assert!(!html.contains("font-weight: 600"));
    assert!(!html.contains("color: #333"));

    // headings flattened, interactive elements removed
    assert!(!html.contains("<h2"));
    assert!(!html.contains("<button"));
    assert!(!html.contains("Copy code"));

    // math exemption zone keeps its own classes and styles
    assert!(html.contains("katex-html"));
    assert!(html.contains("margin-right: 0.1em"));

    // the uniform contract is present
    assert!(html.contains("font-weight: normal; font-size: 12px;"));
}

#[test]
fn test_table_striping_in_assembled_output() {
    let html = assembled_html(BidiPolicy::Runs);
    // 4 header-free rows -> rows 1 and 3 (0-based) shaded
    assert_eq!(html.matches("background-color: #f9f9f9").count(), 2);
    assert!(html.contains("border-collapse: collapse"));
    assert!(html.contains("background-color: #f2f2f2"));
}

#[test]
fn test_code_label_becomes_language_tag() {
    let html = assembled_html(BidiPolicy::Runs);
    assert!(html.contains("language-python"));
    // syntect rewrote the block into styled spans
    assert!(html.contains("<span style=\"color:"));
}

#[test]
fn test_run_level_bidi_wraps_hebrew_run_only() {
    let html = assembled_html(BidiPolicy::Runs);
    assert!(html.contains(r#"<span dir="rtl">תסביר בבקשה</span>"#));
    assert!(html.contains(" what ownership means"));
}

#[test]
fn test_block_level_bidi_flips_whole_block() {
    let html = assembled_html(BidiPolicy::Block);
    assert!(html.contains(r#"dir="rtl""#));
    assert!(html.contains("text-align: right;"));
    assert!(!html.contains(r#"<span dir="rtl">"#));
}

#[test]
fn test_math_pass_injected_before_content() {
    let html = assembled_html(BidiPolicy::Runs);
    let config_pos = html.find("window.MathJax").unwrap();
    let loader_pos = html.find("tex-chtml.js").unwrap();
    let content_pos = html.find("Q1: ").unwrap();
    assert!(config_pos < loader_pos);
    assert!(loader_pos < content_pos);
    assert!(html.contains("inlineMath"));
    assert!(html.contains("displayMath"));
}

#[test]
fn test_empty_page_reports_extraction_empty() {
    let err = extract_pairs(
        "<html><body><p>not a conversation</p></body></html>",
        DEFAULT_QUESTION_SELECTOR,
        DEFAULT_ANSWER_SELECTOR,
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::ExtractionEmpty));
}
