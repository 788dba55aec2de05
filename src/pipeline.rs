//! Pipeline orchestration
//!
//! Single-threaded, cooperative: each stage runs to completion before the
//! next begins, suspending only at the async hand-offs (browser launch,
//! capture, render). Pairs are processed sequentially because output order
//! must match document order exactly and the container is one exclusively
//! owned resource.
//!
//! Capability acquisition is an explicit ordered list of steps (the
//! highlighter, the typesetter, then the rendering surface), each failing
//! with `CapabilityUnavailable`. There is no partial-capability fallback.
//! Cancellation exists only before work begins (empty filename); once
//! assembly starts there is no mid-pipeline cancellation or timeout.
//!
//! The browser session is released on every exit path, success or failure.

use crate::assemble;
use crate::bidi;
use crate::config::ExportConfig;
use crate::enhance::{self, MathConfig, MathJaxTypesetter, MathTypesetter, SyntectHighlighter};
use crate::error::{ExportError, ExportResult};
use crate::export::browser::BrowserSession;
use crate::export::{ChromiumRenderer, ExportSummary, PdfSettings, export_document};
use crate::extract;
use crate::sanitize::Sanitizer;
use crate::source::{ConversationSource, load_snapshot};

/// Progress updates emitted as the pipeline advances.
#[derive(Debug, Clone)]
pub enum ExportProgress {
    /// Acquiring capabilities
    Initializing,
    /// Rendering surface launched
    BrowserLaunched,
    /// Snapshot of the conversation page loaded
    SnapshotLoaded,
    /// Collecting question/answer pairs
    Extracting,
    /// Building the output container
    Assembling,
    /// Math and code passes running
    Enhancing,
    /// Handing the tree to the document renderer
    Rendering,
    /// Export finished, PDF written
    Completed,
    /// Export failed
    Error(String),
}

impl std::fmt::Display for ExportProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing export"),
            Self::BrowserLaunched => write!(f, "Rendering surface ready"),
            Self::SnapshotLoaded => write!(f, "Conversation snapshot loaded"),
            Self::Extracting => write!(f, "Extracting conversation pairs"),
            Self::Assembling => write!(f, "Assembling document"),
            Self::Enhancing => write!(f, "Typesetting math and highlighting code"),
            Self::Rendering => write!(f, "Generating PDF"),
            Self::Completed => write!(f, "PDF export complete"),
            Self::Error(msg) => write!(f, "Export failed: {msg}"),
        }
    }
}

/// Run one export end to end.
pub async fn run(
    config: &ExportConfig,
    on_progress: &(dyn Fn(ExportProgress) + Send + Sync),
) -> ExportResult<ExportSummary> {
    // Cancellation is all-or-nothing and only possible here, before any
    // work has begun.
    if config.filename().is_empty() {
        return Err(ExportError::Cancelled);
    }

    on_progress(ExportProgress::Initializing);

    // Ordered capability acquisition; each step fails with
    // CapabilityUnavailable and aborts the export.
    let highlighter = SyntectHighlighter::new(config.highlight_theme())?;
    let typesetter = MathJaxTypesetter::new(MathConfig::new(
        config.math_bundle_url(),
        config.math_trusted(),
    ))?;
    let session = BrowserSession::launch(config.headless()).await?;
    on_progress(ExportProgress::BrowserLaunched);

    let result = run_stages(config, &session, &highlighter, &typesetter, on_progress).await;

    // Scoped release: the rendering surface goes away no matter how the
    // stages ended.
    session.close().await;

    if let Err(e) = &result {
        on_progress(ExportProgress::Error(e.to_string()));
    }
    result
}

async fn run_stages(
    config: &ExportConfig,
    session: &BrowserSession,
    highlighter: &SyntectHighlighter,
    typesetter: &MathJaxTypesetter,
    on_progress: &(dyn Fn(ExportProgress) + Send + Sync),
) -> ExportResult<ExportSummary> {
    let source = ConversationSource::parse(config.source());
    let snapshot = load_snapshot(&source, session, config.page_load_timeout_secs()).await?;
    on_progress(ExportProgress::SnapshotLoaded);

    on_progress(ExportProgress::Extracting);
    let pairs = extract::extract_pairs(
        &snapshot,
        config.question_selector(),
        config.answer_selector(),
    )?;

    on_progress(ExportProgress::Assembling);
    let sanitizer = Sanitizer::new(config.strip_selectors().to_vec(), config.font_size());
    let tree = assemble::assemble(&pairs, &sanitizer, config.font_size())?;

    bidi::apply(tree.root(), config.bidi_policy());

    on_progress(ExportProgress::Enhancing);
    typesetter.typeset(tree.root())?;
    enhance::highlight_code_blocks(tree.root(), highlighter)?;

    on_progress(ExportProgress::Rendering);
    let settings = PdfSettings {
        filename: config.filename().to_string(),
        margin_inches: config.margin_inches(),
        image_quality: config.image_quality(),
        raster_scale: config.raster_scale(),
        avoid_page_breaks: config.avoid_page_breaks(),
        settle_ms: config.settle_ms(),
    };
    let renderer = ChromiumRenderer::new(session);
    let summary = export_document(
        &tree.to_html()?,
        &settings,
        &renderer,
        config.output_dir(),
        tree.pair_count(),
    )
    .await?;

    on_progress(ExportProgress::Completed);
    Ok(summary)
}
