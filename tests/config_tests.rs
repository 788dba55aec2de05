//! Tests for the type-safe configuration builder pattern

use convoprint::BidiPolicy;
use convoprint::config::ExportConfig;

#[test]
fn test_builder_requires_source() {
    // This should not compile if uncommented - testing compile-time guarantees
    // let config = ExportConfig::builder().build();

    // This SHOULD compile - the required source is provided
    let config = ExportConfig::builder()
        .source("conversation.html")
        .build()
        .unwrap();

    assert_eq!(config.source(), "conversation.html");
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = ExportConfig::builder()
        .source("https://chat.example.com/c/abc")
        .build()
        .unwrap();

    assert_eq!(config.filename(), "chatgpt_conversation.pdf");
    assert_eq!(config.font_size(), "12px");
    assert_eq!(config.bidi_policy(), BidiPolicy::Runs);
    assert!(config.headless());
    assert!(config.math_trusted());
    assert!(config.avoid_page_breaks());
    assert_eq!(config.margin_inches(), 0.5);
    assert_eq!(config.image_quality(), 0.98);
    assert_eq!(config.raster_scale(), 2.0);
    assert_eq!(config.highlight_theme(), "InspiredGitHub");
    assert_eq!(config.page_load_timeout_secs(), 30);
}

#[test]
fn test_builder_with_all_optional_fields() {
    let config = ExportConfig::builder()
        .source("snapshot.html")
        .filename("my export")
        .output_dir("/tmp/out")
        .font_size("11pt")
        .question_selector(".q")
        .answer_selector(".a")
        .strip_selectors(vec!["button".to_string()])
        .bidi_policy(BidiPolicy::Block)
        .highlight_theme("base16-ocean.light")
        .math_trusted(false)
        .headless(false)
        .margin_inches(1.0)
        .image_quality(0.9)
        .raster_scale(1.5)
        .avoid_page_breaks(false)
        .build()
        .unwrap();

    assert_eq!(config.filename(), "my export.pdf");
    assert_eq!(config.font_size(), "11pt");
    assert_eq!(config.question_selector(), ".q");
    assert_eq!(config.bidi_policy(), BidiPolicy::Block);
    assert!(!config.headless());
    assert!(!config.math_trusted());
    assert!(!config.avoid_page_breaks());
}

#[test]
fn test_filename_pdf_suffix_not_duplicated() {
    let config = ExportConfig::builder()
        .source("snapshot.html")
        .filename("notes.pdf")
        .build()
        .unwrap();
    assert_eq!(config.filename(), "notes.pdf");
}

#[test]
fn test_empty_filename_survives_to_signal_cancellation() {
    // The pipeline turns an empty filename into a pre-work Cancelled error;
    // the builder must not error or substitute a default.
    let config = ExportConfig::builder()
        .source("snapshot.html")
        .filename("   ")
        .build()
        .unwrap();
    assert_eq!(config.filename(), "");
}

#[test]
fn test_builder_rejects_empty_source() {
    assert!(ExportConfig::builder().source("   ").build().is_err());
}

#[test]
fn test_builder_rejects_out_of_range_quality() {
    let result = ExportConfig::builder()
        .source("snapshot.html")
        .image_quality(1.5)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_config_round_trips_through_serde() {
    let config = ExportConfig::builder()
        .source("snapshot.html")
        .bidi_policy(BidiPolicy::Block)
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: ExportConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.source(), "snapshot.html");
    assert_eq!(back.bidi_policy(), BidiPolicy::Block);
}
